use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 카테고리 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub bidder_id: i64,
    pub listing_id: i64,
    pub amount: i64,
    pub bid_at: DateTime<Utc>,
}

// 댓글 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub author_id: i64,
    pub listing_id: i64,
    pub content: String,
    pub commented_at: DateTime<Utc>,
}

// 관심 목록 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchlistEntry {
    pub id: i64,
    pub user_id: i64,
    pub listing_id: i64,
}

// 목록/상세 화면용 상품 (등록자, 카테고리 이름 포함)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ListingSummary {
    pub id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    pub title: String,
    pub image_url: String,
    pub details: String,
    pub current_bid: i64,
    pub listed_at: DateTime<Utc>,
    pub is_closed: bool,
    pub category_id: i64,
    pub category_name: String,
}

// 화면용 입찰 (입찰자 이름 포함)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BidView {
    pub id: i64,
    pub bidder_id: i64,
    pub bidder_username: String,
    pub amount: i64,
    pub bid_at: DateTime<Utc>,
}

// 화면용 댓글 (작성자 이름 포함)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub commented_at: DateTime<Utc>,
}
