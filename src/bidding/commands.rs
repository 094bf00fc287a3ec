/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 경매 종료
// region:    --- Imports
use super::statements;
use crate::auction::model::Bid;
use crate::database::DatabaseManager;
use crate::error::AppError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
}

/// 경매 종료 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloseListingCommand {
    pub listing_id: i64,
    pub user_id: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ListingState {
    owner_id: i64,
    current_bid: i64,
    is_closed: bool,
}

/// 1. 입찰
/// 입찰 기록 추가, 현재 가격 갱신, 다른 금액의 입찰 기록 삭제를 한 트랜잭션으로 처리한다.
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    db_manager: &DatabaseManager,
) -> Result<Bid, AppError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    db_manager
        .transaction::<_, Bid, AppError>(move |tx| {
            Box::pin(async move {
                let state = sqlx::query_as::<_, ListingState>(statements::GET_LISTING_STATE)
                    .bind(cmd.listing_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(AppError::listing_not_found)?;

                if state.is_closed {
                    return Err(AppError::Validation(
                        "This listing is already closed.".to_string(),
                    ));
                }

                let min_bid = state.current_bid.checked_add(1).ok_or_else(|| {
                    AppError::Validation("This listing cannot accept a higher bid.".to_string())
                })?;
                if cmd.amount < min_bid {
                    return Err(AppError::Validation(format!(
                        "Your bid must be at least ${}.",
                        min_bid
                    )));
                }

                let bid = sqlx::query_as::<_, Bid>(statements::INSERT_BID)
                    .bind(cmd.bidder_id)
                    .bind(cmd.listing_id)
                    .bind(cmd.amount)
                    .bind(Utc::now())
                    .fetch_one(&mut **tx)
                    .await?;

                let updated = sqlx::query(statements::UPDATE_CURRENT_BID)
                    .bind(cmd.amount)
                    .bind(cmd.listing_id)
                    .execute(&mut **tx)
                    .await?;

                if updated.rows_affected() == 0 {
                    warn!(
                        "{:<12} --> 현재 가격 갱신 실패: 이미 더 높은 입찰이 있음",
                        "Command"
                    );
                    return Err(AppError::Validation(
                        "A higher bid was placed in the meantime. Please try again.".to_string(),
                    ));
                }

                let pruned = sqlx::query(statements::PRUNE_BIDS)
                    .bind(cmd.listing_id)
                    .bind(cmd.amount)
                    .execute(&mut **tx)
                    .await?;

                info!(
                    "{:<12} --> 입찰 성공: 현재 가격 {}, 삭제된 이전 입찰 {}개",
                    "Command",
                    cmd.amount,
                    pruned.rows_affected()
                );
                Ok::<_, AppError>(bid)
            })
        })
        .await
}

/// 2. 경매 종료
/// 등록자만 종료할 수 있으며 이미 종료된 경매는 그대로 둔다.
pub async fn handle_close_listing(
    cmd: CloseListingCommand,
    db_manager: &DatabaseManager,
) -> Result<(), AppError> {
    info!("{:<12} --> 경매 종료 요청 처리 시작: {:?}", "Command", cmd);

    db_manager
        .transaction::<_, (), AppError>(move |tx| {
            Box::pin(async move {
                let state = sqlx::query_as::<_, ListingState>(statements::GET_LISTING_STATE)
                    .bind(cmd.listing_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(AppError::listing_not_found)?;

                if state.owner_id != cmd.user_id {
                    return Err(AppError::Forbidden(
                        "Only the owner can close this listing.".to_string(),
                    ));
                }

                if state.is_closed {
                    info!("{:<12} --> 이미 종료된 경매", "Command");
                    return Ok(());
                }

                sqlx::query(statements::CLOSE_LISTING)
                    .bind(cmd.listing_id)
                    .execute(&mut **tx)
                    .await?;

                info!(
                    "{:<12} --> 경매 종료: id {}, 최종 가격 {}",
                    "Command", cmd.listing_id, state.current_bid
                );
                Ok::<_, AppError>(())
            })
        })
        .await
}

// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::{
        file_db, memory_db, remove_file_db, seed_category, seed_listing, seed_user,
    };
    use crate::query::handlers;
    use std::sync::Arc;

    /// 입찰 테스트
    #[tokio::test]
    async fn test_place_bid_updates_price_and_prunes() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner").await;
        let first = seed_user(&db, "first").await;
        let second = seed_user(&db, "second").await;
        let category = seed_category(&db, "Toys").await;
        let listing_id = seed_listing(&db, owner.id, category.id, 100).await;

        handle_place_bid(
            PlaceBidCommand {
                listing_id,
                bidder_id: first.id,
                amount: 150,
            },
            &db,
        )
        .await
        .unwrap();

        let bid = handle_place_bid(
            PlaceBidCommand {
                listing_id,
                bidder_id: second.id,
                amount: 200,
            },
            &db,
        )
        .await
        .unwrap();
        assert_eq!(bid.amount, 200);
        assert_eq!(bid.bidder_id, second.id);

        let listing = handlers::get_listing(&db, listing_id).await.unwrap().unwrap();
        assert_eq!(listing.current_bid, 200);

        // 새 입찰가와 다른 입찰 기록은 삭제된다
        let bids = handlers::get_listing_bids(&db, listing_id).await.unwrap();
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].amount, 200);

        let top = handlers::get_top_bid(&db, listing_id).await.unwrap().unwrap();
        assert_eq!(top.bidder_username, "second");
    }

    /// 낮은 입찰 거절 테스트
    #[tokio::test]
    async fn test_low_bid_is_rejected() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner").await;
        let bidder = seed_user(&db, "bidder").await;
        let category = seed_category(&db, "Toys").await;
        let listing_id = seed_listing(&db, owner.id, category.id, 100).await;

        for amount in [50, 100] {
            let err = handle_place_bid(
                PlaceBidCommand {
                    listing_id,
                    bidder_id: bidder.id,
                    amount,
                },
                &db,
            )
            .await
            .unwrap_err();
            match err {
                AppError::Validation(msg) => assert_eq!(msg, "Your bid must be at least $101."),
                other => panic!("unexpected error: {:?}", other),
            }
        }

        let listing = handlers::get_listing(&db, listing_id).await.unwrap().unwrap();
        assert_eq!(listing.current_bid, 100);
        assert!(handlers::get_listing_bids(&db, listing_id)
            .await
            .unwrap()
            .is_empty());
    }

    /// 존재하지 않는 상품 입찰 테스트
    #[tokio::test]
    async fn test_bid_on_missing_listing() {
        let db = memory_db().await;
        let bidder = seed_user(&db, "bidder").await;

        let err = handle_place_bid(
            PlaceBidCommand {
                listing_id: 999,
                bidder_id: bidder.id,
                amount: 10,
            },
            &db,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    /// 경매 종료 테스트
    #[tokio::test]
    async fn test_close_listing() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner").await;
        let other = seed_user(&db, "other").await;
        let category = seed_category(&db, "Toys").await;
        let listing_id = seed_listing(&db, owner.id, category.id, 100).await;

        // 등록자가 아니면 종료할 수 없다
        let err = handle_close_listing(
            CloseListingCommand {
                listing_id,
                user_id: other.id,
            },
            &db,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let close = CloseListingCommand {
            listing_id,
            user_id: owner.id,
        };
        handle_close_listing(close.clone(), &db).await.unwrap();
        handle_close_listing(close, &db).await.unwrap();

        let listing = handlers::get_listing(&db, listing_id).await.unwrap().unwrap();
        assert!(listing.is_closed);

        // 종료된 경매에는 입찰할 수 없다
        let err = handle_place_bid(
            PlaceBidCommand {
                listing_id,
                bidder_id: other.id,
                amount: 500,
            },
            &db,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let listing = handlers::get_listing(&db, listing_id).await.unwrap().unwrap();
        assert_eq!(listing.current_bid, 100);
    }

    /// 최대 가격 상품 입찰 테스트
    #[tokio::test]
    async fn test_bid_on_listing_at_max_price() {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner").await;
        let bidder = seed_user(&db, "bidder").await;
        let category = seed_category(&db, "Toys").await;
        let listing_id = seed_listing(&db, owner.id, category.id, i64::MAX).await;

        for amount in [5, i64::MAX] {
            let err = handle_place_bid(
                PlaceBidCommand {
                    listing_id,
                    bidder_id: bidder.id,
                    amount,
                },
                &db,
            )
            .await
            .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }

        let listing = handlers::get_listing(&db, listing_id).await.unwrap().unwrap();
        assert_eq!(listing.current_bid, i64::MAX);
    }

    /// 파일 DB 동시 입찰 테스트
    /// 잠금 오류 없이 모두 성공하거나 입찰가 검증으로 거절되어야 한다.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_bids_on_file_database() {
        let (db, path) = file_db("concurrent-bids", 5).await;
        let owner = seed_user(&db, "owner").await;
        let bidder = seed_user(&db, "bidder").await;
        let category = seed_category(&db, "Toys").await;
        let listing_id = seed_listing(&db, owner.id, category.id, 100).await;

        let db = Arc::new(db);
        let bidder_id = bidder.id;
        let mut tasks = Vec::new();
        for amount in [105, 101, 110, 103, 108, 102, 109, 104, 107, 106] {
            let db = Arc::clone(&db);
            tasks.push(tokio::spawn(async move {
                handle_place_bid(
                    PlaceBidCommand {
                        listing_id,
                        bidder_id,
                        amount,
                    },
                    &db,
                )
                .await
            }));
        }

        let mut accepted = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(AppError::Validation(_)) => {}
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
        assert!(accepted >= 1);

        let listing = handlers::get_listing(&db, listing_id).await.unwrap().unwrap();
        assert_eq!(listing.current_bid, 110);
        let bids = handlers::get_listing_bids(&db, listing_id).await.unwrap();
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].amount, 110);

        let db = Arc::into_inner(db).expect("남은 참조 없음");
        remove_file_db(db, path).await;
    }
}
