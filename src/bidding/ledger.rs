/// 입찰 원장
/// 입찰 기록 추가와 리스팅 현재 가격 갱신을 하나의 원자적 범위로 묶는다
// region:    --- Imports
use crate::auction::error::AuctionError;
use crate::auction::model::{Bid, Listing};
use crate::database::DatabaseManager;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

// region:    --- Bid Entry
/// 원장에 기록을 요청하는 입찰
#[derive(Debug, Clone)]
pub struct BidEntry {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
}
// endregion: --- Bid Entry

// region:    --- Bid Rule
/// 최소 허용 입찰가
/// 첫 입찰이면 시작 가격, 이후에는 현재 가격
pub fn bid_floor(starting_price: i64, current_price: i64, has_bids: bool) -> i64 {
    if has_bids {
        current_price
    } else {
        starting_price
    }
}

/// 입찰 수락 규칙
/// 첫 입찰은 시작 가격과 같아도 되고, 이후 입찰은 현재 가격을 초과해야 한다
pub fn bid_accepted(amount: i64, floor: i64, has_bids: bool) -> bool {
    if has_bids {
        amount > floor
    } else {
        amount >= floor
    }
}
// endregion: --- Bid Rule

// region:    --- Bid Ledger Trait
/// 입찰 원장 트레이트
#[async_trait]
pub trait BidLedger {
    /// 입찰을 검증한 뒤 기록하고 리스팅 현재 가격을 갱신한다
    /// 두 쓰기는 항상 함께 적용되거나 함께 거부된다
    async fn append_bid(&self, entry: BidEntry) -> Result<Bid, AuctionError>;
}

/// 입찰 원장 구현체
pub struct PostgresBidLedger {
    db_manager: Arc<DatabaseManager>,
}

/// 입찰 원장 생성
impl PostgresBidLedger {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

/// 입찰 원장 구현체 메서드 구현
#[async_trait]
impl BidLedger for PostgresBidLedger {
    async fn append_bid(&self, entry: BidEntry) -> Result<Bid, AuctionError> {
        info!("{:<12} --> 입찰 기록 요청: {:?}", "Ledger", entry);
        let now = Utc::now();

        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    // 리스팅 행 잠금: 같은 리스팅의 입찰을 직렬화한다
                    let listing = sqlx::query_as::<_, Listing>(
                        "SELECT id, title, description, starting_price, current_price, image_url, category, owner_id, active, created_at
                         FROM listings WHERE id = $1 FOR UPDATE",
                    )
                    .bind(entry.listing_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(AuctionError::NotFound)?;

                    // 종료된 리스팅은 입찰 대상이 아니다
                    if !listing.active {
                        return Err(AuctionError::NotFound);
                    }

                    // 첫 입찰 여부 (행 잠금 아래에서만 판정)
                    let has_bids = sqlx::query_scalar::<_, bool>(
                        "SELECT EXISTS (SELECT 1 FROM bids WHERE listing_id = $1)",
                    )
                    .bind(entry.listing_id)
                    .fetch_one(&mut **tx)
                    .await?;

                    let floor =
                        bid_floor(listing.starting_price, listing.current_price, has_bids);
                    if !bid_accepted(entry.amount, floor, has_bids) {
                        return Err(AuctionError::InsufficientBid { floor });
                    }

                    // 입찰 기록 추가
                    let bid = sqlx::query_as::<_, Bid>(
                        "INSERT INTO bids (listing_id, bidder_id, amount, bid_time)
                         VALUES ($1, $2, $3, $4)
                         RETURNING id, listing_id, bidder_id, amount, bid_time",
                    )
                    .bind(entry.listing_id)
                    .bind(entry.bidder_id)
                    .bind(entry.amount)
                    .bind(now)
                    .fetch_one(&mut **tx)
                    .await?;

                    // 현재 가격 갱신 (입찰 기록과 같은 트랜잭션)
                    sqlx::query("UPDATE listings SET current_price = $1 WHERE id = $2")
                        .bind(entry.amount)
                        .bind(entry.listing_id)
                        .execute(&mut **tx)
                        .await?;

                    info!(
                        "{:<12} --> 입찰 기록 완료: 리스팅 {} 현재 가격 {}",
                        "Ledger", entry.listing_id, entry.amount
                    );
                    Ok(bid)
                })
            })
            .await
    }
}
// endregion: --- Bid Ledger Trait

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_bid_floor_is_starting_price() {
        assert_eq!(bid_floor(100, 100, false), 100);
        // 첫 입찰 전에는 current_price == starting_price 가 불변식이지만
        // floor 계산은 입찰 유무만 본다
        assert_eq!(bid_floor(100, 250, true), 250);
    }

    #[test]
    fn first_bid_may_equal_starting_price() {
        assert!(bid_accepted(100, 100, false));
        assert!(bid_accepted(120, 100, false));
        assert!(!bid_accepted(99, 100, false));
    }

    #[test]
    fn later_bids_must_exceed_current_price() {
        assert!(!bid_accepted(100, 100, true));
        assert!(!bid_accepted(99, 100, true));
        assert!(bid_accepted(101, 100, true));
    }

    #[test]
    fn zero_starting_price_accepts_zero_opening_bid() {
        assert!(bid_accepted(0, 0, false));
        assert!(!bid_accepted(0, 0, true));
    }
}
// endregion: --- Tests
