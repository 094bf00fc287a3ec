// region:    --- Imports
use crate::account::AccountError;
use crate::templates;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use thiserror::Error;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- App Error
/// 요청 처리 중 발생하는 오류
/// 대부분 오류 페이지로 렌더링된다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// 로그인 후 돌아갈 경로
    #[error("login required")]
    LoginRequired { next: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("account error: {0}")]
    Account(#[from] AccountError),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// 존재하지 않는 경매 상품
    pub fn listing_not_found() -> Self {
        AppError::NotFound("There is no listing associated".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => {
                info!("{:<12} --> 리소스 없음: {}", "Error", msg);
                (StatusCode::NOT_FOUND, msg.clone())
            }
            AppError::Validation(msg) => {
                info!("{:<12} --> 검증 실패: {}", "Error", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Forbidden(msg) => {
                warn!("{:<12} --> 권한 없음: {}", "Error", msg);
                (StatusCode::FORBIDDEN, msg.clone())
            }
            AppError::LoginRequired { next } => {
                return Redirect::to(&login_url(next)).into_response();
            }
            AppError::Database(e) => {
                error!("{:<12} --> 데이터베이스 오류: {:?}", "Error", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong while talking to the database.".to_string(),
                )
            }
            AppError::Account(e) => {
                error!("{:<12} --> 계정 처리 오류: {:?}", "Error", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong while processing your account.".to_string(),
                )
            }
            AppError::Template(e) => {
                error!("{:<12} --> 템플릿 렌더링 오류: {:?}", "Error", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response();
            }
        };

        match templates::render_error(&message) {
            Ok(page) => (status, page).into_response(),
            Err(e) => {
                error!("{:<12} --> 오류 페이지 렌더링 실패: {:?}", "Error", e);
                (status, message).into_response()
            }
        }
    }
}

/// 로그인 페이지 경로 (돌아올 경로 포함)
fn login_url(next: &str) -> String {
    if next.is_empty() || next == "/" {
        return "/login".to_string();
    }
    match serde_urlencoded::to_string(&[("next", next)]) {
        Ok(query) => format!("/login?{}", query),
        Err(e) => {
            warn!("{:<12} --> next 경로 인코딩 실패: {:?}", "Error", e);
            "/login".to_string()
        }
    }
}
// endregion: --- App Error
