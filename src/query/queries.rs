/// 진행 중인 경매 상품 조회
pub const GET_OPEN_LISTINGS: &str = r#"
    SELECT l.id, l.owner_id, u.username AS owner_username, l.title, l.image_url, l.details,
           l.current_bid, l.listed_at, l.is_closed, l.category_id, c.name AS category_name
    FROM listings l
    JOIN users u ON u.id = l.owner_id
    JOIN categories c ON c.id = l.category_id
    WHERE l.is_closed = 0
    ORDER BY l.listed_at DESC, l.id DESC
"#;

/// 종료된 경매 상품 조회
pub const GET_CLOSED_LISTINGS: &str = r#"
    SELECT l.id, l.owner_id, u.username AS owner_username, l.title, l.image_url, l.details,
           l.current_bid, l.listed_at, l.is_closed, l.category_id, c.name AS category_name
    FROM listings l
    JOIN users u ON u.id = l.owner_id
    JOIN categories c ON c.id = l.category_id
    WHERE l.is_closed = 1
    ORDER BY l.listed_at DESC, l.id DESC
"#;

/// 경매 상품 조회
pub const GET_LISTING: &str = r#"
    SELECT l.id, l.owner_id, u.username AS owner_username, l.title, l.image_url, l.details,
           l.current_bid, l.listed_at, l.is_closed, l.category_id, c.name AS category_name
    FROM listings l
    JOIN users u ON u.id = l.owner_id
    JOIN categories c ON c.id = l.category_id
    WHERE l.id = $1
"#;

/// 카테고리별 진행 중인 경매 상품 조회
pub const GET_LISTINGS_BY_CATEGORY: &str = r#"
    SELECT l.id, l.owner_id, u.username AS owner_username, l.title, l.image_url, l.details,
           l.current_bid, l.listed_at, l.is_closed, l.category_id, c.name AS category_name
    FROM listings l
    JOIN users u ON u.id = l.owner_id
    JOIN categories c ON c.id = l.category_id
    WHERE l.category_id = $1 AND l.is_closed = 0
    ORDER BY l.listed_at DESC, l.id DESC
"#;

/// 관심 목록의 진행 중인 경매 상품 조회
pub const GET_WATCHLIST_LISTINGS: &str = r#"
    SELECT l.id, l.owner_id, u.username AS owner_username, l.title, l.image_url, l.details,
           l.current_bid, l.listed_at, l.is_closed, l.category_id, c.name AS category_name
    FROM watchlist w
    JOIN listings l ON l.id = w.listing_id
    JOIN users u ON u.id = l.owner_id
    JOIN categories c ON c.id = l.category_id
    WHERE w.user_id = $1 AND l.is_closed = 0
    ORDER BY w.id DESC
"#;

/// 관심 목록 포함 여부
pub const IS_WATCHED: &str =
    "SELECT EXISTS(SELECT 1 FROM watchlist WHERE user_id = $1 AND listing_id = $2)";

/// 상품 댓글 조회
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT c.id, c.author_id, u.username AS author_username, c.content, c.commented_at
    FROM comments c
    JOIN users u ON u.id = c.author_id
    WHERE c.listing_id = $1
    ORDER BY c.commented_at ASC, c.id ASC
"#;

/// 최고 입찰 조회
pub const GET_TOP_BID: &str = r#"
    SELECT b.id, b.bidder_id, u.username AS bidder_username, b.amount, b.bid_at
    FROM bids b
    JOIN users u ON u.id = b.bidder_id
    WHERE b.listing_id = $1
    ORDER BY b.amount DESC, b.bid_at DESC, b.id DESC
    LIMIT 1
"#;

/// 상품 입찰 조회
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, bidder_id, listing_id, amount, bid_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY bid_at DESC, id DESC
"#;

/// 상품 입찰 수
pub const COUNT_LISTING_BIDS: &str = "SELECT COUNT(*) FROM bids WHERE listing_id = $1";

/// 모든 카테고리 조회
pub const GET_ALL_CATEGORIES: &str = "SELECT id, name FROM categories ORDER BY name";

/// 카테고리 이름으로 조회
pub const GET_CATEGORY_BY_NAME: &str = "SELECT id, name FROM categories WHERE name = $1";
