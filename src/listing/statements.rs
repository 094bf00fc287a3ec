/// 경매 상품 등록
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (owner_id, title, image_url, details, current_bid, listed_at, is_closed, category_id)
    VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
    RETURNING id
"#;

/// 상품 존재 여부
pub const LISTING_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM listings WHERE id = $1)";

/// 카테고리 존재 여부
pub const CATEGORY_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)";

/// 카테고리 추가 (이미 있으면 무시)
pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING";

/// 댓글 추가
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (author_id, listing_id, content, commented_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, author_id, listing_id, content, commented_at
"#;

/// 관심 목록 항목 조회
pub const GET_WATCHLIST_ENTRY: &str =
    "SELECT id, user_id, listing_id FROM watchlist WHERE user_id = $1 AND listing_id = $2";

/// 관심 목록 추가
pub const INSERT_WATCHLIST_ENTRY: &str =
    "INSERT INTO watchlist (user_id, listing_id) VALUES ($1, $2) RETURNING id, user_id, listing_id";

/// 관심 목록 삭제
pub const DELETE_WATCHLIST_ENTRY: &str =
    "DELETE FROM watchlist WHERE user_id = $1 AND listing_id = $2";
