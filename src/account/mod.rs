/// 계정 관련 처리
/// 1. 회원 가입
/// 2. 로그인 인증
/// 3. 세션 관리
// region:    --- Imports
use chrono::Utc;
use model::User;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::database::DatabaseManager;

// endregion: --- Imports

// region:    --- Modules
pub mod extract;
pub mod model;
pub mod password;
pub mod queries;
pub mod session;

// endregion: --- Modules

// region:    --- Account Error
/// 계정 처리 오류
/// 사용자에게 보여줄 메시지가 있는 오류는 폼을 다시 렌더링할 때 사용한다.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Username and password are required.")]
    MissingFields,

    #[error("Passwords must match.")]
    PasswordMismatch,

    #[error("Username already taken.")]
    UsernameTaken,

    #[error("Invalid username and/or password.")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AccountError {
    /// 폼에 다시 표시할 수 있는 오류인지 여부
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AccountError::MissingFields
                | AccountError::PasswordMismatch
                | AccountError::UsernameTaken
                | AccountError::InvalidCredentials
        )
    }
}
// endregion: --- Account Error

// region:    --- Forms
/// 회원 가입 폼
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

/// 로그인 폼
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}
// endregion: --- Forms

// region:    --- Account Commands
/// 1. 회원 가입
pub async fn register(
    db_manager: &DatabaseManager,
    form: RegisterForm,
) -> Result<User, AccountError> {
    let username = form.username.trim().to_string();
    info!("{:<12} --> 회원 가입 요청: {}", "Account", username);

    if username.is_empty() || form.password.is_empty() {
        return Err(AccountError::MissingFields);
    }
    if form.password != form.confirmation {
        return Err(AccountError::PasswordMismatch);
    }

    let password_hash = password::hash_password(form.password).await?;

    let result = sqlx::query_as::<_, User>(queries::INSERT_USER)
        .bind(&username)
        .bind(form.email.trim())
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(db_manager.pool())
        .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!("{:<12} --> 이미 존재하는 사용자 이름: {}", "Account", username);
            Err(AccountError::UsernameTaken)
        }
        Err(e) => Err(e.into()),
    }
}

/// 2. 로그인 인증
pub async fn authenticate(
    db_manager: &DatabaseManager,
    username: &str,
    password: &str,
) -> Result<User, AccountError> {
    info!("{:<12} --> 로그인 시도: {}", "Account", username);
    let user = get_user_by_username(db_manager, username.trim())
        .await?
        .ok_or(AccountError::InvalidCredentials)?;

    if password::verify_password(password.to_string(), user.password_hash.clone()).await? {
        Ok(user)
    } else {
        warn!("{:<12} --> 비밀번호 불일치: {}", "Account", username);
        Err(AccountError::InvalidCredentials)
    }
}

/// 사용자 이름으로 조회
pub async fn get_user_by_username(
    db_manager: &DatabaseManager,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
        .bind(username)
        .fetch_optional(db_manager.pool())
        .await
}
// endregion: --- Account Commands
