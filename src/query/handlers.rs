// region:    --- Imports
use super::queries;
use crate::auction::model::{Bid, BidView, Category, CommentView, ListingSummary};
use crate::database::DatabaseManager;
use sqlx::Error as SqlxError;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 진행 중인 경매 상품 조회
pub async fn get_open_listings(
    db_manager: &DatabaseManager,
) -> Result<Vec<ListingSummary>, SqlxError> {
    info!("{:<12} --> 진행 중인 상품 조회", "Query");
    sqlx::query_as::<_, ListingSummary>(queries::GET_OPEN_LISTINGS)
        .fetch_all(db_manager.pool())
        .await
}

/// 종료된 경매 상품 조회
pub async fn get_closed_listings(
    db_manager: &DatabaseManager,
) -> Result<Vec<ListingSummary>, SqlxError> {
    info!("{:<12} --> 종료된 상품 조회", "Query");
    sqlx::query_as::<_, ListingSummary>(queries::GET_CLOSED_LISTINGS)
        .fetch_all(db_manager.pool())
        .await
}

/// 상품 조회
pub async fn get_listing(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Option<ListingSummary>, SqlxError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", listing_id);
    sqlx::query_as::<_, ListingSummary>(queries::GET_LISTING)
        .bind(listing_id)
        .fetch_optional(db_manager.pool())
        .await
}

/// 카테고리별 상품 조회
pub async fn get_listings_by_category(
    db_manager: &DatabaseManager,
    category_id: i64,
) -> Result<Vec<ListingSummary>, SqlxError> {
    info!("{:<12} --> 카테고리별 상품 조회 id: {}", "Query", category_id);
    sqlx::query_as::<_, ListingSummary>(queries::GET_LISTINGS_BY_CATEGORY)
        .bind(category_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 관심 목록 조회
pub async fn get_watchlist(
    db_manager: &DatabaseManager,
    user_id: i64,
) -> Result<Vec<ListingSummary>, SqlxError> {
    info!("{:<12} --> 관심 목록 조회 user_id: {}", "Query", user_id);
    sqlx::query_as::<_, ListingSummary>(queries::GET_WATCHLIST_LISTINGS)
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 관심 목록 포함 여부
pub async fn is_watched(
    db_manager: &DatabaseManager,
    user_id: i64,
    listing_id: i64,
) -> Result<bool, SqlxError> {
    sqlx::query_scalar::<_, bool>(queries::IS_WATCHED)
        .bind(user_id)
        .bind(listing_id)
        .fetch_one(db_manager.pool())
        .await
}

/// 상품 댓글 조회
pub async fn get_listing_comments(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<CommentView>, SqlxError> {
    info!("{:<12} --> 상품 댓글 조회 id: {}", "Query", listing_id);
    sqlx::query_as::<_, CommentView>(queries::GET_LISTING_COMMENTS)
        .bind(listing_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 최고 입찰 조회
pub async fn get_top_bid(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Option<BidView>, SqlxError> {
    info!("{:<12} --> 최고 입찰 조회 id: {}", "Query", listing_id);
    sqlx::query_as::<_, BidView>(queries::GET_TOP_BID)
        .bind(listing_id)
        .fetch_optional(db_manager.pool())
        .await
}

/// 상품 입찰 조회
pub async fn get_listing_bids(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<Vec<Bid>, SqlxError> {
    info!("{:<12} --> 상품 입찰 조회 id: {}", "Query", listing_id);
    sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
        .bind(listing_id)
        .fetch_all(db_manager.pool())
        .await
}

/// 상품 입찰 수
pub async fn count_listing_bids(
    db_manager: &DatabaseManager,
    listing_id: i64,
) -> Result<i64, SqlxError> {
    sqlx::query_scalar::<_, i64>(queries::COUNT_LISTING_BIDS)
        .bind(listing_id)
        .fetch_one(db_manager.pool())
        .await
}

/// 모든 카테고리 조회
pub async fn get_categories(db_manager: &DatabaseManager) -> Result<Vec<Category>, SqlxError> {
    info!("{:<12} --> 모든 카테고리 조회", "Query");
    sqlx::query_as::<_, Category>(queries::GET_ALL_CATEGORIES)
        .fetch_all(db_manager.pool())
        .await
}

/// 카테고리 이름으로 조회
pub async fn get_category_by_name(
    db_manager: &DatabaseManager,
    name: &str,
) -> Result<Option<Category>, SqlxError> {
    info!("{:<12} --> 카테고리 조회 name: {}", "Query", name);
    sqlx::query_as::<_, Category>(queries::GET_CATEGORY_BY_NAME)
        .bind(name)
        .fetch_optional(db_manager.pool())
        .await
}

// endregion: --- Query Handlers
