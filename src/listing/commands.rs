/// 경매 상품 관련 커맨드 처리
/// 1. 상품 등록
/// 2. 댓글 작성
/// 3. 관심 목록 추가/삭제
/// 4. 카테고리 준비
// region:    --- Imports
use super::statements;
use crate::auction::model::{Comment, WatchlistEntry};
use crate::database::DatabaseManager;
use crate::error::AppError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

const MAX_TITLE_LEN: usize = 50;

// region:    --- Forms
/// 상품 등록 폼 (입력 그대로)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateListingForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub starting_bid: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub category_id: String,
}

impl CreateListingForm {
    /// 폼 검증 후 등록 명령으로 변환
    pub fn validate(&self, owner_id: i64) -> Result<CreateListingCommand, AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required.".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::Validation(format!(
                "Title must be at most {} characters.",
                MAX_TITLE_LEN
            )));
        }

        let image_url = self.image_url.trim();
        let has_scheme = ["http://", "https://"]
            .iter()
            .any(|scheme| image_url.len() > scheme.len() && image_url.starts_with(scheme));
        if !has_scheme {
            return Err(AppError::Validation(
                "Image URL must start with http:// or https://.".to_string(),
            ));
        }

        let starting_bid = self
            .starting_bid
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|amount| *amount >= 0)
            .ok_or_else(|| {
                AppError::Validation("Starting bid must be a whole number of 0 or more.".to_string())
            })?;

        let category_id = self
            .category_id
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Validation("Please select a category.".to_string()))?;

        Ok(CreateListingCommand {
            owner_id,
            title: title.to_string(),
            image_url: image_url.to_string(),
            details: self.details.trim().to_string(),
            starting_bid,
            category_id,
        })
    }
}
// endregion: --- Forms

// region:    --- Commands
/// 상품 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateListingCommand {
    pub owner_id: i64,
    pub title: String,
    pub image_url: String,
    pub details: String,
    pub starting_bid: i64,
    pub category_id: i64,
}

/// 댓글 작성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddCommentCommand {
    pub listing_id: i64,
    pub author_id: i64,
    pub content: String,
}

/// 관심 목록 명령
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct WatchlistCommand {
    pub listing_id: i64,
    pub user_id: i64,
}

/// 1. 상품 등록, 새 상품 id 반환
pub async fn handle_create_listing(
    cmd: CreateListingCommand,
    db_manager: &DatabaseManager,
) -> Result<i64, AppError> {
    info!("{:<12} --> 상품 등록 요청 처리 시작: {:?}", "Command", cmd);

    db_manager
        .transaction::<_, i64, AppError>(move |tx| {
            Box::pin(async move {
                let category_exists = sqlx::query_scalar::<_, bool>(statements::CATEGORY_EXISTS)
                    .bind(cmd.category_id)
                    .fetch_one(&mut **tx)
                    .await?;
                if !category_exists {
                    return Err(AppError::Validation("Please select a category.".to_string()));
                }

                let listing_id = sqlx::query_scalar::<_, i64>(statements::INSERT_LISTING)
                    .bind(cmd.owner_id)
                    .bind(&cmd.title)
                    .bind(&cmd.image_url)
                    .bind(&cmd.details)
                    .bind(cmd.starting_bid)
                    .bind(Utc::now())
                    .bind(cmd.category_id)
                    .fetch_one(&mut **tx)
                    .await?;

                info!("{:<12} --> 상품 등록 성공: id {}", "Command", listing_id);
                Ok::<_, AppError>(listing_id)
            })
        })
        .await
}

/// 2. 댓글 작성
pub async fn handle_add_comment(
    cmd: AddCommentCommand,
    db_manager: &DatabaseManager,
) -> Result<Comment, AppError> {
    info!(
        "{:<12} --> 댓글 작성 요청: listing {}, author {}",
        "Command", cmd.listing_id, cmd.author_id
    );

    let content = cmd.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::Validation("Comment cannot be empty.".to_string()));
    }

    db_manager
        .transaction::<_, Comment, AppError>(move |tx| {
            Box::pin(async move {
                ensure_listing(tx, cmd.listing_id).await?;

                let comment = sqlx::query_as::<_, Comment>(statements::INSERT_COMMENT)
                    .bind(cmd.author_id)
                    .bind(cmd.listing_id)
                    .bind(content)
                    .bind(Utc::now())
                    .fetch_one(&mut **tx)
                    .await?;
                Ok::<_, AppError>(comment)
            })
        })
        .await
}

/// 3-1. 관심 목록 추가 (이미 있으면 그대로)
pub async fn handle_add_watchlist(
    cmd: WatchlistCommand,
    db_manager: &DatabaseManager,
) -> Result<WatchlistEntry, AppError> {
    info!("{:<12} --> 관심 목록 추가: {:?}", "Command", cmd);

    db_manager
        .transaction::<_, WatchlistEntry, AppError>(move |tx| {
            Box::pin(async move {
                ensure_listing(tx, cmd.listing_id).await?;

                let existing = sqlx::query_as::<_, WatchlistEntry>(statements::GET_WATCHLIST_ENTRY)
                    .bind(cmd.user_id)
                    .bind(cmd.listing_id)
                    .fetch_optional(&mut **tx)
                    .await?;
                if let Some(entry) = existing {
                    return Ok(entry);
                }

                let entry = sqlx::query_as::<_, WatchlistEntry>(statements::INSERT_WATCHLIST_ENTRY)
                    .bind(cmd.user_id)
                    .bind(cmd.listing_id)
                    .fetch_one(&mut **tx)
                    .await?;
                Ok::<_, AppError>(entry)
            })
        })
        .await
}

/// 3-2. 관심 목록 삭제, 삭제 여부 반환
pub async fn handle_remove_watchlist(
    cmd: WatchlistCommand,
    db_manager: &DatabaseManager,
) -> Result<bool, AppError> {
    info!("{:<12} --> 관심 목록 삭제: {:?}", "Command", cmd);

    db_manager
        .transaction::<_, bool, AppError>(move |tx| {
            Box::pin(async move {
                ensure_listing(tx, cmd.listing_id).await?;

                let result = sqlx::query(statements::DELETE_WATCHLIST_ENTRY)
                    .bind(cmd.user_id)
                    .bind(cmd.listing_id)
                    .execute(&mut **tx)
                    .await?;
                Ok::<_, AppError>(result.rows_affected() > 0)
            })
        })
        .await
}

/// 4. 설정된 카테고리 준비, 새로 추가된 개수 반환
pub async fn ensure_categories(
    db_manager: &DatabaseManager,
    names: &[String],
) -> Result<u64, sqlx::Error> {
    let names = names.to_vec();
    let inserted = db_manager
        .transaction::<_, u64, sqlx::Error>(move |tx| {
            Box::pin(async move {
                let mut inserted = 0;
                for name in names {
                    inserted += sqlx::query(statements::INSERT_CATEGORY)
                        .bind(name)
                        .execute(&mut **tx)
                        .await?
                        .rows_affected();
                }
                Ok(inserted)
            })
        })
        .await?;

    info!("{:<12} --> 카테고리 {}개 추가", "Command", inserted);
    Ok(inserted)
}

/// 상품 존재 확인
async fn ensure_listing(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    listing_id: i64,
) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, bool>(statements::LISTING_EXISTS)
        .bind(listing_id)
        .fetch_one(&mut **tx)
        .await?;
    if exists {
        Ok(())
    } else {
        Err(AppError::listing_not_found())
    }
}

// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{memory_db, seed_category, seed_listing, seed_user};
    use crate::query::handlers;

    fn form(title: &str, image_url: &str, starting_bid: &str, category_id: &str) -> CreateListingForm {
        CreateListingForm {
            title: title.to_string(),
            image_url: image_url.to_string(),
            starting_bid: starting_bid.to_string(),
            details: "  A fine item.  ".to_string(),
            category_id: category_id.to_string(),
        }
    }

    /// 폼 검증 테스트
    #[test]
    fn test_form_validation() {
        let cmd = form("Lamp", "https://img.example/lamp.png", "25", "3")
            .validate(7)
            .unwrap();
        assert_eq!(cmd.owner_id, 7);
        assert_eq!(cmd.starting_bid, 25);
        assert_eq!(cmd.category_id, 3);
        assert_eq!(cmd.details, "A fine item.");

        // 제목은 50자까지 허용 (앞뒤 공백 제외, 문자 단위)
        let longest = "가".repeat(MAX_TITLE_LEN);
        let cmd = form(&format!(" {} ", longest), "http://img.example/a.png", "0", "1")
            .validate(1)
            .unwrap();
        assert_eq!(cmd.title, longest);
        assert_eq!(cmd.starting_bid, 0);

        let cases = [
            form("", "https://img.example/a.png", "1", "1"),
            form(&"x".repeat(51), "https://img.example/a.png", "1", "1"),
            form("Lamp", "ftp://img.example/a.png", "1", "1"),
            form("Lamp", "https://", "1", "1"),
            form("Lamp", "https://img.example/a.png", "-1", "1"),
            form("Lamp", "https://img.example/a.png", "ten", "1"),
            form("Lamp", "https://img.example/a.png", "1", ""),
        ];
        for case in cases {
            assert!(
                matches!(case.validate(1), Err(AppError::Validation(_))),
                "expected validation error for {:?}",
                case
            );
        }
    }

    /// 상품 등록 후 조회 테스트
    #[tokio::test]
    async fn test_create_listing_round_trip() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner").await;
        let category = seed_category(&db, "Home").await;

        let cmd = form("Lamp", "https://img.example/lamp.png", "25", &category.id.to_string())
            .validate(owner.id)
            .unwrap();
        let listing_id = handle_create_listing(cmd, &db).await.unwrap();

        let listing = handlers::get_listing(&db, listing_id).await.unwrap().unwrap();
        assert_eq!(listing.title, "Lamp");
        assert_eq!(listing.image_url, "https://img.example/lamp.png");
        assert_eq!(listing.details, "A fine item.");
        assert_eq!(listing.current_bid, 25);
        assert_eq!(listing.owner_username, "owner");
        assert_eq!(listing.category_name, "Home");
        assert!(!listing.is_closed);
    }

    /// 존재하지 않는 카테고리 테스트
    #[tokio::test]
    async fn test_create_listing_unknown_category() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner").await;

        let cmd = form("Lamp", "https://img.example/lamp.png", "25", "42")
            .validate(owner.id)
            .unwrap();
        let err = handle_create_listing(cmd, &db).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    /// 관심 목록 추가/삭제 테스트
    #[tokio::test]
    async fn test_watchlist_add_then_remove() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner").await;
        let watcher = seed_user(&db, "watcher").await;
        let category = seed_category(&db, "Home").await;
        let listing_id = seed_listing(&db, owner.id, category.id, 10).await;
        let cmd = WatchlistCommand {
            listing_id,
            user_id: watcher.id,
        };

        let first = handle_add_watchlist(cmd, &db).await.unwrap();
        let second = handle_add_watchlist(cmd, &db).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(handlers::get_watchlist(&db, watcher.id).await.unwrap().len(), 1);
        assert!(handlers::is_watched(&db, watcher.id, listing_id).await.unwrap());

        assert!(handle_remove_watchlist(cmd, &db).await.unwrap());
        assert!(!handle_remove_watchlist(cmd, &db).await.unwrap());
        assert!(handlers::get_watchlist(&db, watcher.id).await.unwrap().is_empty());

        let missing = WatchlistCommand {
            listing_id: 999,
            user_id: watcher.id,
        };
        assert!(matches!(
            handle_add_watchlist(missing, &db).await,
            Err(AppError::NotFound(_))
        ));
    }

    /// 댓글 작성 테스트
    #[tokio::test]
    async fn test_add_comment() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner").await;
        let category = seed_category(&db, "Home").await;
        let listing_id = seed_listing(&db, owner.id, category.id, 10).await;

        let comment = handle_add_comment(
            AddCommentCommand {
                listing_id,
                author_id: owner.id,
                content: "  Still available?  ".to_string(),
            },
            &db,
        )
        .await
        .unwrap();
        assert_eq!(comment.content, "Still available?");

        let err = handle_add_comment(
            AddCommentCommand {
                listing_id,
                author_id: owner.id,
                content: "   ".to_string(),
            },
            &db,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let comments = handlers::get_listing_comments(&db, listing_id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author_username, "owner");
    }

    /// 카테고리 준비 테스트
    #[tokio::test]
    async fn test_ensure_categories_is_idempotent() {
        let db = memory_db().await;
        let names = vec!["Books".to_string(), "Garden".to_string()];

        assert_eq!(ensure_categories(&db, &names).await.unwrap(), 2);
        assert_eq!(ensure_categories(&db, &names).await.unwrap(), 0);

        let categories = handlers::get_categories(&db).await.unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Books", "Garden"]);
    }
}
