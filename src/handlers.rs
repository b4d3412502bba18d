// region:    --- Imports
use crate::auction::error::AuctionError;
use crate::bidding::commands::{
    self, AddCommentCommand, CloseListingCommand, CreateListingCommand, DeleteCommentCommand,
    PlaceBidCommand, ToggleWatchlistCommand,
};
use crate::bidding::ledger::PostgresBidLedger;
use crate::config::Config;
use crate::database::DatabaseManager;
use crate::query;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Router

/// 핸들러 공유 상태
pub type AppState = (Arc<DatabaseManager>, Arc<Config>);

/// 라우터 구성 (서버와 테스트가 같은 라우터를 쓴다)
pub fn routes(db_manager: Arc<DatabaseManager>, config: Arc<Config>) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/listings",
            post(handle_create_listing).get(handle_get_listings),
        )
        .route("/listings/:id", get(handle_get_listing))
        .route("/listings/:id/bids", get(handle_get_listing_bids))
        .route("/listings/:id/highest-bid", get(handle_get_highest_bid))
        .route("/listings/:id/comments", get(handle_get_listing_comments))
        .route("/bid", post(handle_bid))
        .route("/close", post(handle_close))
        .route("/watchlist", post(handle_toggle_watchlist))
        .route("/watchlist/:user_id", get(handle_get_watchlist))
        .route("/watchlist/:user_id/count", get(handle_get_watchlist_count))
        .route("/comments", post(handle_add_comment))
        .route("/comments/delete", post(handle_delete_comment))
        .route("/categories", get(handle_get_categories))
        .layer(cors)
        .with_state((db_manager, config))
}

/// 도메인 오류를 HTTP 응답으로 변환
/// 입찰 금액 미달이면 floor 를 본문에 싣는다
fn error_response(e: AuctionError) -> Response {
    let status = match &e {
        AuctionError::NotFound => StatusCode::NOT_FOUND,
        AuctionError::NotOwner => StatusCode::FORBIDDEN,
        AuctionError::InsufficientBid { .. } => StatusCode::BAD_REQUEST,
        AuctionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AuctionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if let AuctionError::Database(db_err) = &e {
        error!("{:<12} --> 데이터베이스 오류: {:?}", "Handler", db_err);
    }

    let mut body = serde_json::json!({
        "error": e.to_string(),
        "code": e.code(),
    });
    if let AuctionError::InsufficientBid { floor } = &e {
        body["floor"] = serde_json::json!(floor);
    }
    (status, Json(body)).into_response()
}

// endregion: --- Router

// region:    --- Command Handlers

/// 리스팅 생성 요청 처리
pub async fn handle_create_listing(
    State((db_manager, config)): State<AppState>,
    Json(cmd): Json<CreateListingCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 리스팅 생성 요청: {:?}", "Handler", cmd);
    match commands::handle_create_listing(cmd, &db_manager, &config).await {
        Ok(listing) => (StatusCode::CREATED, Json(listing)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State((db_manager, _)): State<AppState>,
    Json(cmd): Json<PlaceBidCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Handler", cmd);

    // 입찰 원장 생성
    let ledger = PostgresBidLedger::new(Arc::clone(&db_manager));

    match commands::handle_place_bid(cmd, &ledger).await {
        Ok(bid) => Json(serde_json::json!({
            "message": "입찰이 성공적으로 처리되었습니다.",
            "bid_id": bid.id,
            "current_price": bid.amount,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// 리스팅 종료 요청 처리
pub async fn handle_close(
    State((db_manager, _)): State<AppState>,
    Json(cmd): Json<CloseListingCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 리스팅 종료 요청: {:?}", "Handler", cmd);
    match commands::handle_close_listing(cmd, &db_manager).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => error_response(e),
    }
}

/// 관심 목록 토글 요청 처리
pub async fn handle_toggle_watchlist(
    State((db_manager, _)): State<AppState>,
    Json(cmd): Json<ToggleWatchlistCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 관심 목록 토글 요청: {:?}", "Handler", cmd);
    match commands::handle_toggle_watchlist(cmd, &db_manager).await {
        Ok(watching) => Json(serde_json::json!({ "watching": watching })).into_response(),
        Err(e) => error_response(e),
    }
}

/// 댓글 작성 요청 처리
pub async fn handle_add_comment(
    State((db_manager, _)): State<AppState>,
    Json(cmd): Json<AddCommentCommand>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 댓글 작성 요청: 리스팅 {}",
        "Handler", cmd.listing_id
    );
    match commands::handle_add_comment(cmd, &db_manager).await {
        Ok(comment) => (StatusCode::CREATED, Json(comment)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 댓글 삭제 요청 처리
pub async fn handle_delete_comment(
    State((db_manager, _)): State<AppState>,
    Json(cmd): Json<DeleteCommentCommand>,
) -> impl IntoResponse {
    info!("{:<12} --> 댓글 삭제 요청: {:?}", "Handler", cmd);
    match commands::handle_delete_comment(cmd, &db_manager).await {
        Ok(()) => Json(serde_json::json!({ "message": "댓글이 삭제되었습니다." })).into_response(),
        Err(e) => error_response(e),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 리스팅 목록 필터
#[derive(Debug, Deserialize)]
pub struct ListingFilter {
    pub category: Option<String>,
}

/// 활성 리스팅 목록 조회
pub async fn handle_get_listings(
    State((db_manager, _)): State<AppState>,
    Query(filter): Query<ListingFilter>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 활성 리스팅 조회 category: {:?}",
        "HandlerQuery", filter.category
    );
    match query::handlers::get_active_listings(&db_manager, filter.category).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => error_response(e),
    }
}

/// 리스팅 상세 조회 (입찰 수, 마지막 입찰자 포함)
pub async fn handle_get_listing(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 리스팅 조회 id: {}", "HandlerQuery", listing_id);
    let listing = match query::handlers::get_listing(&db_manager, listing_id).await {
        Ok(listing) => listing,
        Err(e) => return error_response(e),
    };
    let bid_count = match query::handlers::get_bid_count(&db_manager, listing_id).await {
        Ok(count) => count,
        Err(e) => return error_response(e),
    };
    let last_bidder = match query::handlers::get_last_bidder(&db_manager, listing_id).await {
        Ok(bidder) => bidder,
        Err(e) => return error_response(e),
    };

    Json(serde_json::json!({
        "listing": listing,
        "bid_count": bid_count,
        "last_bidder": last_bidder,
    }))
    .into_response()
}

/// 입찰 이력 조회
pub async fn handle_get_listing_bids(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 입찰 이력 조회 id: {}",
        "HandlerQuery", listing_id
    );
    match query::handlers::get_listing_bids(&db_manager, listing_id).await {
        Ok(bids) => Json(bids).into_response(),
        Err(e) => error_response(e),
    }
}

/// 최고 입찰가 조회
pub async fn handle_get_highest_bid(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 최고 입찰가 조회 id: {}",
        "HandlerQuery", listing_id
    );
    match query::handlers::get_highest_bid(&db_manager, listing_id).await {
        Ok(highest) => Json(highest).into_response(),
        Err(e) => error_response(e),
    }
}

/// 댓글 목록 조회
pub async fn handle_get_listing_comments(
    State((db_manager, _)): State<AppState>,
    Path(listing_id): Path<i64>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 댓글 목록 조회 id: {}",
        "HandlerQuery", listing_id
    );
    match query::handlers::get_listing_comments(&db_manager, listing_id).await {
        Ok(comments) => Json(comments).into_response(),
        Err(e) => error_response(e),
    }
}

/// 사용자 관심 목록 조회
pub async fn handle_get_watchlist(
    State((db_manager, _)): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    info!("{:<12} --> 관심 목록 조회 user: {}", "HandlerQuery", user_id);
    match query::handlers::get_user_watchlist(&db_manager, user_id).await {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => error_response(e),
    }
}

/// 사용자 관심 목록 수 조회
pub async fn handle_get_watchlist_count(
    State((db_manager, _)): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    info!(
        "{:<12} --> 관심 목록 수 조회 user: {}",
        "HandlerQuery", user_id
    );
    match query::handlers::get_watchlist_count(&db_manager, user_id).await {
        Ok(count) => Json(serde_json::json!({ "watchlist_count": count })).into_response(),
        Err(e) => error_response(e),
    }
}

/// 카테고리 목록 조회 (설정으로 공급된 집합)
pub async fn handle_get_categories(State((_, config)): State<AppState>) -> impl IntoResponse {
    info!("{:<12} --> 카테고리 목록 조회", "HandlerQuery");
    Json(config.categories.clone())
}

// endregion: --- Query Handlers
