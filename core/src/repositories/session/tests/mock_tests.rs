//! Tests for the mock session repository

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::{DeviceMeta, RefreshSession, TokenId, UserId};
use crate::errors::DomainError;
use crate::repositories::session::{MockSessionRepository, SessionRepository};

fn session_for(user_id: UserId, expires_in: Duration) -> RefreshSession {
    let now = Utc::now();
    RefreshSession {
        token_id: TokenId::generate(),
        user_id,
        device: DeviceMeta::default(),
        login_at: now,
        expires_at: now + expires_in,
        access_token_id: TokenId::generate(),
    }
}

#[tokio::test]
async fn test_create_rejects_duplicate_token_id() {
    let repo = MockSessionRepository::new();
    let session = session_for(UserId::from_uuid(Uuid::new_v4()), Duration::days(7));

    repo.create(&session).await.unwrap();
    let result = repo.create(&session).await;

    assert!(matches!(result, Err(DomainError::Conflict { .. })));
}

#[tokio::test]
async fn test_list_filters_by_user_and_activity() {
    let repo = MockSessionRepository::new();
    let user = UserId::from_uuid(Uuid::new_v4());
    let other = UserId::from_uuid(Uuid::new_v4());

    repo.insert(session_for(user, Duration::days(7))).await;
    repo.insert(session_for(user, Duration::seconds(-5))).await;
    repo.insert(session_for(other, Duration::days(7))).await;

    assert_eq!(repo.list(user, false).await.unwrap().len(), 2);
    assert_eq!(repo.list(user, true).await.unwrap().len(), 1);
    assert_eq!(repo.count_active(user).await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let repo = MockSessionRepository::new();
    let session = session_for(UserId::from_uuid(Uuid::new_v4()), Duration::days(7));
    repo.insert(session.clone()).await;

    assert!(repo.delete(session.token_id).await.unwrap());
    assert!(!repo.delete(session.token_id).await.unwrap());
}
