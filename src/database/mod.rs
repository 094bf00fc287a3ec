use crate::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DatabaseManager {
    pub pool: Arc<SqlitePool>,
}

impl DatabaseManager {
    /// 데이터베이스 매니저 생성
    /// 인메모리 DB는 커넥션마다 별도 DB가 되므로 커넥션 하나를 계속 유지한다.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await?
        };

        info!("{:<12} --> 데이터베이스 연결: {}", "Database", config.url);
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// 데이터베이스 풀 가져오기
    pub fn get_pool(&self) -> Arc<SqlitePool> {
        Arc::clone(&self.pool)
    }

    /// 트랜잭션 실행
    /// 쓰기 락은 BEGIN IMMEDIATE 로 시작 시점에 잡으며, 락 대기는 busy_timeout 을 따른다.
    pub async fn transaction<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: for<'c> FnOnce(
            &'c mut sqlx::Transaction<'_, sqlx::Sqlite>,
        ) -> Pin<Box<dyn Future<Output = Result<R, E>> + Send + 'c>>,
        E: From<sqlx::Error>,
    {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let result = f(&mut tx).await;
        match result {
            Ok(r) => {
                tx.commit().await?;
                Ok(r)
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    /// 데이터베이스 초기화
    pub async fn initialize_database(&self) -> Result<(), sqlx::Error> {
        let create_schema_sql = include_str!("../sql/01-create-schema.sql");
        self.execute_multi_query(create_schema_sql).await?;

        Ok(())
    }

    /// 여러 쿼리 실행
    async fn execute_multi_query(&self, sql: &str) -> Result<(), sqlx::Error> {
        for query in sql.split(';') {
            let query = query.trim();
            if !query.is_empty() {
                sqlx::query(query).execute(&*self.pool).await?;
            }
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::DatabaseManager;
    use crate::account::model::User;
    use crate::account::{register, RegisterForm};
    use crate::auction::model::Category;
    use crate::config::DatabaseConfig;
    use crate::listing::commands::{ensure_categories, handle_create_listing, CreateListingCommand};
    use crate::query::handlers;
    use std::path::PathBuf;

    /// 스키마가 적용된 인메모리 데이터베이스
    pub async fn memory_db() -> DatabaseManager {
        let db = DatabaseManager::new(&DatabaseConfig::in_memory())
            .await
            .expect("인메모리 DB 생성 실패");
        db.initialize_database().await.expect("스키마 생성 실패");
        db
    }

    /// 스키마가 적용된 임시 파일 데이터베이스 (경로 함께 반환)
    pub async fn file_db(name: &str, max_connections: u32) -> (DatabaseManager, PathBuf) {
        let path = std::env::temp_dir().join(format!("{}-{}.db", name, uuid::Uuid::new_v4()));
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections,
        };
        let db = DatabaseManager::new(&config)
            .await
            .expect("파일 DB 생성 실패");
        db.initialize_database().await.expect("스키마 생성 실패");
        (db, path)
    }

    /// 임시 파일 데이터베이스 삭제
    pub async fn remove_file_db(db: DatabaseManager, path: PathBuf) {
        db.pool().close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    /// 테스트용 사용자 생성 (비밀번호는 "password")
    pub async fn seed_user(db: &DatabaseManager, username: &str) -> User {
        register(
            db,
            RegisterForm {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: "password".to_string(),
                confirmation: "password".to_string(),
            },
        )
        .await
        .expect("사용자 생성 실패")
    }

    /// 테스트용 카테고리 생성
    pub async fn seed_category(db: &DatabaseManager, name: &str) -> Category {
        ensure_categories(db, &[name.to_string()])
            .await
            .expect("카테고리 생성 실패");
        handlers::get_category_by_name(db, name)
            .await
            .expect("카테고리 조회 실패")
            .expect("카테고리 없음")
    }

    /// 테스트용 상품 생성
    pub async fn seed_listing(
        db: &DatabaseManager,
        owner_id: i64,
        category_id: i64,
        starting_bid: i64,
    ) -> i64 {
        handle_create_listing(
            CreateListingCommand {
                owner_id,
                title: "Test item".to_string(),
                image_url: "https://img.example/item.png".to_string(),
                details: "For testing.".to_string(),
                starting_bid,
                category_id,
            },
            db,
        )
        .await
        .expect("상품 생성 실패")
    }
}
