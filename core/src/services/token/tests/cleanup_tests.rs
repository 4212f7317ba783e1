//! Tests for the expired session sweep

use chrono::{Duration, Utc};
use std::sync::Arc;

use sk_shared::CleanupConfig;

use crate::domain::entities::{DeviceMeta, RefreshSession, TokenId, UserId};
use crate::repositories::MockSessionRepository;
use crate::services::token::SessionCleanupService;
use crate::test_support::user;

fn session(user_id: UserId, expires_in: Duration) -> RefreshSession {
    let now = Utc::now();
    RefreshSession {
        token_id: TokenId::generate(),
        user_id,
        device: DeviceMeta::default(),
        login_at: now - Duration::days(1),
        expires_at: now + expires_in,
        access_token_id: TokenId::generate(),
    }
}

fn config(enabled: bool) -> CleanupConfig {
    CleanupConfig {
        enabled,
        interval_seconds: 60,
    }
}

#[tokio::test]
async fn test_run_cleanup_removes_expired_sessions_of_all_users() {
    let repo = Arc::new(MockSessionRepository::new());
    let live = session(user(), Duration::hours(1));
    repo.insert(live.clone()).await;
    repo.insert(session(user(), Duration::seconds(-1))).await;
    repo.insert(session(user(), Duration::hours(-3))).await;

    let service = SessionCleanupService::new(repo.clone(), config(true));
    let result = service.run_cleanup().await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.expired_sessions_deleted, 2);
    assert_eq!(repo.len().await, 1);
    assert!(repo.contains(live.token_id).await);
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let repo = Arc::new(MockSessionRepository::new());
    repo.insert(session(user(), Duration::seconds(-1))).await;

    let service = Arc::new(SessionCleanupService::new(repo.clone(), config(false)));
    let result = service.run_cleanup().await.unwrap();

    assert_eq!(result.expired_sessions_deleted, 0);
    assert_eq!(repo.sweep_calls(), 0);
    assert!(service.start_background_task().is_none());
}

#[tokio::test]
async fn test_store_failure_is_recorded() {
    let repo = Arc::new(MockSessionRepository::new());
    repo.fail_sweeps(true);

    let service = SessionCleanupService::new(repo, config(true));
    let result = service.run_cleanup().await.unwrap();

    assert!(!result.is_success());
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_sweeps_on_interval() {
    let repo = Arc::new(MockSessionRepository::new());
    repo.insert(session(user(), Duration::seconds(-1))).await;

    let service = Arc::new(SessionCleanupService::new(repo.clone(), config(true)));
    let handle = service.start_background_task().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(repo.sweep_calls(), 1);
    assert_eq!(repo.len().await, 0);

    tokio::time::sleep(std::time::Duration::from_secs(61)).await;
    assert_eq!(repo.sweep_calls(), 2);

    handle.abort();
}
