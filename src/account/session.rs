/// 세션 쿠키와 서버측 세션 저장소
// region:    --- Imports
use super::model::{Session, User};
use super::queries;
use crate::database::DatabaseManager;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

// endregion: --- Imports

pub const SESSION_COOKIE_NAME: &str = "auction_session";

// region:    --- Session Store
/// 세션 생성 후 세션 id 반환
pub async fn create_session(
    db_manager: &DatabaseManager,
    user_id: i64,
    ttl_secs: i64,
) -> Result<Session, sqlx::Error> {
    let now = Utc::now();
    let session = Session {
        id: Uuid::new_v4().to_string(),
        user_id,
        created_at: now,
        expires_at: now + Duration::seconds(ttl_secs),
    };

    sqlx::query(queries::INSERT_SESSION)
        .bind(&session.id)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(db_manager.pool())
        .await?;

    info!("{:<12} --> 세션 생성 user_id: {}", "Session", user_id);
    Ok(session)
}

/// 세션 조회
pub async fn get_session(
    db_manager: &DatabaseManager,
    session_id: &str,
) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(queries::GET_SESSION)
        .bind(session_id)
        .fetch_optional(db_manager.pool())
        .await
}

/// 만료되지 않은 세션의 사용자 조회
pub async fn get_session_user(
    db_manager: &DatabaseManager,
    session_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(queries::GET_SESSION_USER)
        .bind(session_id)
        .bind(Utc::now())
        .fetch_optional(db_manager.pool())
        .await
}

/// 세션 삭제
pub async fn delete_session(
    db_manager: &DatabaseManager,
    session_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(queries::DELETE_SESSION)
        .bind(session_id)
        .execute(db_manager.pool())
        .await?;
    info!("{:<12} --> 세션 삭제", "Session");
    Ok(())
}

/// 만료된 세션 삭제, 삭제된 개수 반환
pub async fn delete_expired_sessions(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(queries::DELETE_EXPIRED_SESSIONS)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    debug!(
        "{:<12} --> 만료 세션 {}개 삭제",
        "Session",
        result.rows_affected()
    );
    Ok(result.rows_affected())
}
// endregion: --- Session Store

// region:    --- Cookies
pub fn create_session_cookie(session_id: String, ttl_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl_secs))
        .path("/")
        .build()
}

pub fn create_logout_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(0))
        .path("/")
        .build()
}

/// 쿠키에서 세션 id 추출
pub fn session_id_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
// endregion: --- Cookies
