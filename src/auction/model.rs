use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 리스팅 모델
// current_price 는 시작 가격으로 초기화되고 낙찰된 입찰로만 갱신된다
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub starting_price: i64,
    pub current_price: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub owner_id: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

// 입찰 모델 (생성 후 불변, 추가 전용)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub bid_time: DateTime<Utc>,
}

// 댓글 모델
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub author_id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
