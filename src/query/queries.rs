/// 활성 리스팅 조회
pub const GET_ACTIVE_LISTINGS: &str =
    "SELECT id, title, description, starting_price, current_price, image_url, category, owner_id, active, created_at FROM listings WHERE active ORDER BY created_at DESC";

/// 카테고리별 활성 리스팅 조회
pub const GET_ACTIVE_LISTINGS_BY_CATEGORY: &str =
    "SELECT id, title, description, starting_price, current_price, image_url, category, owner_id, active, created_at FROM listings WHERE active AND category = $1 ORDER BY created_at DESC";

/// 리스팅 조회 (종료된 리스팅도 조회된다)
pub const GET_LISTING: &str =
    "SELECT id, title, description, starting_price, current_price, image_url, category, owner_id, active, created_at FROM listings WHERE id = $1";

/// 입찰 이력 조회
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, listing_id, bidder_id, amount, bid_time
    FROM bids
    WHERE listing_id = $1
    ORDER BY bid_time DESC, id DESC
"#;

/// 최고 입찰가 조회
pub const GET_HIGHEST_BID: &str =
    "SELECT MAX(amount) as highest_bid FROM bids WHERE listing_id = $1";

/// 입찰 수 조회
pub const GET_BID_COUNT: &str = "SELECT COUNT(*) FROM bids WHERE listing_id = $1";

/// 마지막 입찰자 조회
pub const GET_LAST_BIDDER: &str =
    "SELECT bidder_id FROM bids WHERE listing_id = $1 ORDER BY id DESC LIMIT 1";

/// 댓글 목록 조회 (작성 순)
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT id, listing_id, author_id, body, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at, id
"#;

/// 사용자 관심 목록 조회
pub const GET_USER_WATCHLIST: &str = r#"
    SELECT l.id, l.title, l.description, l.starting_price, l.current_price, l.image_url, l.category, l.owner_id, l.active, l.created_at
    FROM listings l
    JOIN watchlist w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY l.created_at DESC
"#;

/// 사용자 관심 목록 수 조회
pub const GET_WATCHLIST_COUNT: &str = "SELECT COUNT(*) FROM watchlist WHERE user_id = $1";
