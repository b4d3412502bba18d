/// 경매 규칙 엔진 커맨드 처리
/// 1. 리스팅 생성
/// 2. 입찰
/// 3. 리스팅 종료
/// 4. 관심 목록 토글
/// 5. 댓글 작성 / 삭제
// region:    --- Imports
use crate::auction::error::AuctionError;
use crate::auction::model::{Bid, Comment, Listing};
use crate::bidding::ledger::{BidEntry, BidLedger};
use crate::config::Config;
use crate::database::DatabaseManager;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

// region:    --- Commands
/// 리스팅 생성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateListingCommand {
    pub title: String,
    pub description: String,
    pub starting_price: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub owner_id: i64,
}

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
}

/// 리스팅 종료 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloseListingCommand {
    pub listing_id: i64,
    pub requester_id: i64,
}

/// 관심 목록 토글 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToggleWatchlistCommand {
    pub listing_id: i64,
    pub user_id: i64,
}

/// 댓글 작성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddCommentCommand {
    pub listing_id: i64,
    pub author_id: i64,
    pub body: String,
}

/// 댓글 삭제 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeleteCommentCommand {
    pub comment_id: i64,
    pub requester_id: i64,
}

// 제목, 설명, 댓글 본문의 최대 길이
const TEXT_MAX_LEN: usize = 200;

/// 1. 리스팅 생성
pub async fn handle_create_listing(
    cmd: CreateListingCommand,
    db_manager: &DatabaseManager,
    config: &Config,
) -> Result<Listing, AuctionError> {
    info!("{:<12} --> 리스팅 생성 요청: {:?}", "Command", cmd);
    validate_listing_input(&cmd, config)?;

    let now = Utc::now();
    let listing = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                // 빈 문자열 카테고리 / 이미지는 미지정으로 저장
                let category = cmd.category.filter(|c| !c.is_empty());
                let image_url = cmd.image_url.filter(|u| !u.is_empty());

                // current_price 는 시작 가격으로 초기화된다
                sqlx::query_as::<_, Listing>(
                    "INSERT INTO listings (title, description, starting_price, current_price, image_url, category, owner_id, active, created_at)
                     VALUES ($1, $2, $3, $3, $4, $5, $6, TRUE, $7)
                     RETURNING id, title, description, starting_price, current_price, image_url, category, owner_id, active, created_at",
                )
                .bind(&cmd.title)
                .bind(&cmd.description)
                .bind(cmd.starting_price)
                .bind(image_url)
                .bind(category)
                .bind(cmd.owner_id)
                .bind(now)
                .fetch_one(&mut **tx)
                .await
                .map_err(AuctionError::from)
            })
        })
        .await?;

    info!(
        "{:<12} --> 리스팅 생성 완료: id {} 시작 가격 {}",
        "Command", listing.id, listing.starting_price
    );
    Ok(listing)
}

/// 2. 입찰
/// 규칙 판정과 두 쓰기는 원장의 원자적 범위 안에서 수행된다
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    ledger: &impl BidLedger,
) -> Result<Bid, AuctionError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    // 금액 형식 검증
    if cmd.amount < 0 {
        return Err(AuctionError::InvalidInput(
            "입찰 금액은 0 이상이어야 합니다.".to_string(),
        ));
    }

    ledger
        .append_bid(BidEntry {
            listing_id: cmd.listing_id,
            bidder_id: cmd.bidder_id,
            amount: cmd.amount,
        })
        .await
}

/// 3. 리스팅 종료
/// 소유자만 종료할 수 있고, 이미 종료된 리스팅이면 그대로 성공한다 (멱등)
pub async fn handle_close_listing(
    cmd: CloseListingCommand,
    db_manager: &DatabaseManager,
) -> Result<Listing, AuctionError> {
    info!("{:<12} --> 리스팅 종료 요청: {:?}", "Command", cmd);

    let listing = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                // 소유자 판정과 상태 변경을 같은 행 잠금 아래에서 수행
                let listing = sqlx::query_as::<_, Listing>(
                    "SELECT id, title, description, starting_price, current_price, image_url, category, owner_id, active, created_at
                     FROM listings WHERE id = $1 FOR UPDATE",
                )
                .bind(cmd.listing_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or(AuctionError::NotFound)?;

                if listing.owner_id != cmd.requester_id {
                    return Err(AuctionError::NotOwner);
                }

                if !listing.active {
                    return Ok(listing);
                }

                let closed = sqlx::query_as::<_, Listing>(
                    "UPDATE listings SET active = FALSE WHERE id = $1
                     RETURNING id, title, description, starting_price, current_price, image_url, category, owner_id, active, created_at",
                )
                .bind(cmd.listing_id)
                .fetch_one(&mut **tx)
                .await?;
                Ok(closed)
            })
        })
        .await?;

    info!("{:<12} --> 리스팅 종료 완료: id {}", "Command", listing.id);
    Ok(listing)
}

/// 4. 관심 목록 토글
/// 항목이 있으면 제거, 없으면 추가하고 새 등록 상태를 반환한다
/// 제거는 종료된 리스팅에서도 허용되고, 추가는 활성 리스팅에만 허용된다
pub async fn handle_toggle_watchlist(
    cmd: ToggleWatchlistCommand,
    db_manager: &DatabaseManager,
) -> Result<bool, AuctionError> {
    info!("{:<12} --> 관심 목록 토글: {:?}", "Command", cmd);

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let removed =
                    sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND listing_id = $2")
                        .bind(cmd.user_id)
                        .bind(cmd.listing_id)
                        .execute(&mut **tx)
                        .await?
                        .rows_affected();
                if removed > 0 {
                    return Ok(false);
                }

                let active =
                    sqlx::query_scalar::<_, bool>("SELECT active FROM listings WHERE id = $1")
                        .bind(cmd.listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(AuctionError::NotFound)?;
                if !active {
                    return Err(AuctionError::NotFound);
                }

                // UNIQUE (user_id, listing_id) 제약으로 동시 토글에도 쌍은 유일하다
                sqlx::query(
                    "INSERT INTO watchlist (user_id, listing_id) VALUES ($1, $2)
                     ON CONFLICT (user_id, listing_id) DO NOTHING",
                )
                .bind(cmd.user_id)
                .bind(cmd.listing_id)
                .execute(&mut **tx)
                .await?;
                Ok(true)
            })
        })
        .await
}

/// 5-1. 댓글 작성
pub async fn handle_add_comment(
    cmd: AddCommentCommand,
    db_manager: &DatabaseManager,
) -> Result<Comment, AuctionError> {
    info!(
        "{:<12} --> 댓글 작성: 리스팅 {} 작성자 {}",
        "Command", cmd.listing_id, cmd.author_id
    );
    validate_comment_body(&cmd.body)?;

    let now = Utc::now();
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let active =
                    sqlx::query_scalar::<_, bool>("SELECT active FROM listings WHERE id = $1")
                        .bind(cmd.listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(AuctionError::NotFound)?;
                if !active {
                    return Err(AuctionError::NotFound);
                }

                sqlx::query_as::<_, Comment>(
                    "INSERT INTO comments (listing_id, author_id, body, created_at)
                     VALUES ($1, $2, $3, $4)
                     RETURNING id, listing_id, author_id, body, created_at",
                )
                .bind(cmd.listing_id)
                .bind(cmd.author_id)
                .bind(&cmd.body)
                .bind(now)
                .fetch_one(&mut **tx)
                .await
                .map_err(AuctionError::from)
            })
        })
        .await
}

/// 5-2. 댓글 삭제
/// 작성자 본인만 삭제할 수 있다 (리스팅 종료 여부와 무관)
pub async fn handle_delete_comment(
    cmd: DeleteCommentCommand,
    db_manager: &DatabaseManager,
) -> Result<(), AuctionError> {
    info!("{:<12} --> 댓글 삭제: {:?}", "Command", cmd);

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let author_id =
                    sqlx::query_scalar::<_, i64>("SELECT author_id FROM comments WHERE id = $1")
                        .bind(cmd.comment_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(AuctionError::NotFound)?;
                if author_id != cmd.requester_id {
                    return Err(AuctionError::NotOwner);
                }

                sqlx::query("DELETE FROM comments WHERE id = $1")
                    .bind(cmd.comment_id)
                    .execute(&mut **tx)
                    .await?;
                Ok(())
            })
        })
        .await
}
// endregion: --- Commands

// region:    --- Validation
/// 리스팅 입력 검증
fn validate_listing_input(cmd: &CreateListingCommand, config: &Config) -> Result<(), AuctionError> {
    if cmd.title.trim().is_empty() || cmd.title.chars().count() > TEXT_MAX_LEN {
        return Err(AuctionError::InvalidInput(
            "제목은 1~200자여야 합니다.".to_string(),
        ));
    }
    if cmd.description.trim().is_empty() || cmd.description.chars().count() > TEXT_MAX_LEN {
        return Err(AuctionError::InvalidInput(
            "설명은 1~200자여야 합니다.".to_string(),
        ));
    }
    if cmd.starting_price < 0 {
        return Err(AuctionError::InvalidInput(
            "시작 가격은 0 이상이어야 합니다.".to_string(),
        ));
    }
    if let Some(category) = cmd.category.as_deref() {
        if !category.is_empty() && !config.is_valid_category(category) {
            return Err(AuctionError::InvalidInput(format!(
                "알 수 없는 카테고리: {}",
                category
            )));
        }
    }
    Ok(())
}

/// 댓글 본문 검증
fn validate_comment_body(body: &str) -> Result<(), AuctionError> {
    if body.trim().is_empty() || body.chars().count() > TEXT_MAX_LEN {
        return Err(AuctionError::InvalidInput(
            "댓글 본문은 1~200자여야 합니다.".to_string(),
        ));
    }
    Ok(())
}
// endregion: --- Validation

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::from_csv("Books,Electronics,Toys", "127.0.0.1:0".to_string())
    }

    fn base_cmd() -> CreateListingCommand {
        CreateListingCommand {
            title: "빈티지 카메라".to_string(),
            description: "필름 카메라, 작동 확인 완료".to_string(),
            starting_price: 50000,
            image_url: None,
            category: Some("Electronics".to_string()),
            owner_id: 1,
        }
    }

    #[test]
    fn valid_listing_input_passes() {
        assert!(validate_listing_input(&base_cmd(), &test_config()).is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let cmd = CreateListingCommand {
            title: "   ".to_string(),
            ..base_cmd()
        };
        assert!(matches!(
            validate_listing_input(&cmd, &test_config()),
            Err(AuctionError::InvalidInput(_))
        ));
    }

    #[test]
    fn negative_starting_price_is_rejected() {
        let cmd = CreateListingCommand {
            starting_price: -1,
            ..base_cmd()
        };
        assert!(matches!(
            validate_listing_input(&cmd, &test_config()),
            Err(AuctionError::InvalidInput(_))
        ));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let cmd = CreateListingCommand {
            category: Some("Vehicles".to_string()),
            ..base_cmd()
        };
        assert!(matches!(
            validate_listing_input(&cmd, &test_config()),
            Err(AuctionError::InvalidInput(_))
        ));
    }

    #[test]
    fn missing_or_blank_category_is_allowed() {
        let cmd = CreateListingCommand {
            category: None,
            ..base_cmd()
        };
        assert!(validate_listing_input(&cmd, &test_config()).is_ok());

        let cmd = CreateListingCommand {
            category: Some(String::new()),
            ..base_cmd()
        };
        assert!(validate_listing_input(&cmd, &test_config()).is_ok());
    }

    #[test]
    fn overlong_comment_body_is_rejected() {
        let body = "가".repeat(201);
        assert!(matches!(
            validate_comment_body(&body),
            Err(AuctionError::InvalidInput(_))
        ));
        assert!(validate_comment_body("첫 입찰 가능할까요?").is_ok());
        assert!(validate_comment_body("").is_err());
    }
}
// endregion: --- Tests
