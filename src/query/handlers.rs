// region:    --- Imports
use super::queries;
use crate::auction::error::AuctionError;
use crate::auction::model::{Bid, Comment, Listing};
use crate::database::DatabaseManager;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 활성 리스팅 조회 (카테고리 지정 시 동등 비교로 필터)
pub async fn get_active_listings(
    db_manager: &DatabaseManager,
    category: Option<String>,
) -> Result<Vec<Listing>, AuctionError> {
    info!(
        "{:<12} --> 활성 리스팅 조회 category: {:?}",
        "Query", category
    );
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                match category {
                    Some(category) => {
                        sqlx::query_as::<_, Listing>(queries::GET_ACTIVE_LISTINGS_BY_CATEGORY)
                            .bind(category)
                            .fetch_all(&mut **tx)
                            .await
                    }
                    None => {
                        sqlx::query_as::<_, Listing>(queries::GET_ACTIVE_LISTINGS)
                            .fetch_all(&mut **tx)
                            .await
                    }
                }
                .map_err(AuctionError::from)
            })
        })
        .await
}

/// 리스팅 조회
pub async fn get_listing(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Listing, AuctionError> {
    info!("{:<12} --> 리스팅 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(queries::GET_LISTING)
                    .bind(listing_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(AuctionError::NotFound)
            })
        })
        .await
}

/// 입찰 이력 조회
pub async fn get_listing_bids(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Bid>, AuctionError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
                    .bind(listing_id)
                    .fetch_all(&mut **tx)
                    .await
                    .map_err(AuctionError::from)
            })
        })
        .await
}

/// 최고 입찰가 조회
pub async fn get_highest_bid(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Option<i64>, AuctionError> {
    info!("{:<12} --> 최고 입찰가 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_scalar::<_, Option<i64>>(queries::GET_HIGHEST_BID)
                    .bind(listing_id)
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(AuctionError::from)
            })
        })
        .await
}

/// 입찰 수 조회
pub async fn get_bid_count(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<i64, AuctionError> {
    info!("{:<12} --> 입찰 수 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_scalar::<_, i64>(queries::GET_BID_COUNT)
                    .bind(listing_id)
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(AuctionError::from)
            })
        })
        .await
}

/// 마지막 입찰자 조회
pub async fn get_last_bidder(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Option<i64>, AuctionError> {
    info!("{:<12} --> 마지막 입찰자 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_scalar::<_, i64>(queries::GET_LAST_BIDDER)
                    .bind(listing_id)
                    .fetch_optional(&mut **tx)
                    .await
                    .map_err(AuctionError::from)
            })
        })
        .await
}

/// 댓글 목록 조회
pub async fn get_listing_comments(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Comment>, AuctionError> {
    info!("{:<12} --> 댓글 목록 조회 id: {}", "Query", listing_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
                    .bind(listing_id)
                    .fetch_all(&mut **tx)
                    .await
                    .map_err(AuctionError::from)
            })
        })
        .await
}

/// 사용자 관심 목록 조회
pub async fn get_user_watchlist(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<Listing>, AuctionError> {
    info!("{:<12} --> 관심 목록 조회 user: {}", "Query", user_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Listing>(queries::GET_USER_WATCHLIST)
                    .bind(user_id)
                    .fetch_all(&mut **tx)
                    .await
                    .map_err(AuctionError::from)
            })
        })
        .await
}

/// 사용자 관심 목록 수 조회
pub async fn get_watchlist_count(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<i64, AuctionError> {
    info!("{:<12} --> 관심 목록 수 조회 user: {}", "Query", user_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_scalar::<_, i64>(queries::GET_WATCHLIST_COUNT)
                    .bind(user_id)
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(AuctionError::from)
            })
        })
        .await
}

// endregion: --- Query Handlers
