// region:    --- Imports
use thiserror::Error;
// endregion: --- Imports

// region:    --- Auction Error
/// 경매 도메인 오류
/// 업무 규칙 위반은 모두 복구 가능한 값으로 호출자에게 반환된다
#[derive(Debug, Error)]
pub enum AuctionError {
    /// 대상 엔티티 없음 (종료된 리스팅에 대한 입찰 포함)
    #[error("대상을 찾을 수 없습니다.")]
    NotFound,

    /// 소유자가 아님 (리스팅 종료, 댓글 삭제 권한)
    #[error("소유자만 수행할 수 있는 작업입니다.")]
    NotOwner,

    /// 입찰 금액 미달. floor 는 최소 허용 입찰가
    #[error("입찰 금액이 최소 허용 가격({floor})보다 낮습니다.")]
    InsufficientBid { floor: i64 },

    /// 잘못된 입력 (금액, 텍스트, 카테고리)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 데이터베이스 오류
    #[error("데이터베이스 오류: {0}")]
    Database(sqlx::Error),
}

/// RowNotFound 는 NotFound 로, 나머지는 Database 오류로 매핑
impl From<sqlx::Error> for AuctionError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AuctionError::NotFound,
            other => AuctionError::Database(other),
        }
    }
}

impl AuctionError {
    /// 핸들러가 응답 본문에 싣는 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            AuctionError::NotFound => "NOT_FOUND",
            AuctionError::NotOwner => "NOT_OWNER",
            AuctionError::InsufficientBid { .. } => "LOW_BID",
            AuctionError::InvalidInput(_) => "INVALID_INPUT",
            AuctionError::Database(_) => "DB_ERROR",
        }
    }
}
// endregion: --- Auction Error

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = AuctionError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AuctionError::NotFound));
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn insufficient_bid_carries_floor() {
        let err = AuctionError::InsufficientBid { floor: 1500 };
        assert_eq!(err.code(), "LOW_BID");
        assert!(err.to_string().contains("1500"));
    }
}
// endregion: --- Tests
