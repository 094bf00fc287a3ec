/// 만료 세션 정리 스케줄러
/// 로그인 세션 외에는 아무것도 건드리지 않는다.
// region:    --- Imports
use crate::account::session;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error};

// endregion: --- Imports

// region:    --- Session Sweeper
/// 만료 세션 정리 스케줄러
pub struct SessionSweeper {
    pool: Arc<SqlitePool>,
    every: Duration,
}

/// 만료 세션 정리 스케줄러 생성
impl SessionSweeper {
    pub fn new(pool: Arc<SqlitePool>, every: Duration) -> Self {
        Self { pool, every }
    }

    /// 만료 세션 정리 스케줄러 시작
    pub fn start(&self) -> JoinHandle<()> {
        let pool = Arc::clone(&self.pool);
        let every = self.every;
        tokio::spawn(async move {
            let mut interval = interval(every);
            loop {
                interval.tick().await;
                match Self::sweep(&pool).await {
                    Ok(removed) => debug!(
                        "{:<12} --> 만료 세션 정리 완료: {}개",
                        "Scheduler", removed
                    ),
                    Err(e) => error!(
                        "{:<12} --> 만료 세션 정리 중 오류 발생: {:?}",
                        "Scheduler", e
                    ),
                }
            }
        })
    }

    /// 만료 세션 정리
    async fn sweep(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        session::delete_expired_sessions(pool).await
    }
}
// endregion: --- Session Sweeper
