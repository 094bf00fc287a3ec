/// 요청에서 로그인 사용자 추출
// region:    --- Imports
use super::model::User;
use super::session;
use crate::app::AppState;
use crate::error::AppError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Method;
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

// endregion: --- Imports

/// 로그인 사용자 (없을 수 있음)
pub struct CurrentUser(pub Option<User>);

/// 로그인 필수 사용자
/// 로그인하지 않았으면 로그인 페이지로 보낸다.
pub struct RequireUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(session_id) = session::session_id_from_jar(&jar) else {
            return Ok(CurrentUser(None));
        };

        let user = session::get_session_user(&state.db_manager, &session_id).await?;
        if user.is_none() {
            debug!("{:<12} --> 유효하지 않은 세션 쿠키", "Extract");
        }
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        match user {
            Some(user) => Ok(RequireUser(user)),
            None => {
                // GET 이 아닌 요청은 로그인 후 다시 보낼 수 없다
                let next = match parts.uri.path_and_query() {
                    Some(pq) if parts.method == Method::GET => pq.as_str().to_string(),
                    _ => "/".to_string(),
                };
                Err(AppError::LoginRequired { next })
            }
        }
    }
}
