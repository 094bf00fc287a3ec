// region:    --- Imports
use crate::config::Config;
use crate::database::DatabaseManager;
use crate::handlers;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// endregion: --- Imports

/// 폼 요청 바디 최대 크기 (64KB)
const MAX_BODY_BYTES: usize = 64 * 1024;

// region:    --- App State
#[derive(Clone)]
pub struct AppState {
    pub db_manager: Arc<DatabaseManager>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db_manager: Arc<DatabaseManager>, config: Config) -> Self {
        Self {
            db_manager,
            config: Arc::new(config),
        }
    }
}
// endregion: --- App State

// region:    --- Router
/// 라우터 설정
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/oldlisting", get(handlers::handle_closed_listings))
        .route(
            "/login",
            get(handlers::handle_login_page).post(handlers::handle_login),
        )
        .route("/logout", get(handlers::handle_logout))
        .route(
            "/register",
            get(handlers::handle_register_page).post(handlers::handle_register),
        )
        .route(
            "/createlisting",
            get(handlers::handle_create_listing_page).post(handlers::handle_create_listing),
        )
        .route("/auctiondetails/:id", get(handlers::handle_listing_details))
        .route("/watchlist", get(handlers::handle_watchlist))
        .route("/add_watchlist/:id", post(handlers::handle_add_watchlist))
        .route(
            "/remove_watchlist/:id",
            post(handlers::handle_remove_watchlist),
        )
        .route("/bidding/:id", post(handlers::handle_bid))
        .route("/close/:id", post(handlers::handle_close_listing))
        .route("/comment/:id", post(handlers::handle_comment))
        .route("/category", get(handlers::handle_categories))
        .route("/category/:name", get(handlers::handle_category_listings))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
// endregion: --- Router
