//! Tests for the mock revocation cache

use std::time::Duration;

use crate::domain::entities::TokenId;
use crate::repositories::revocation::{MockRevocationCache, RevocationCache};

#[tokio::test]
async fn test_entries_expire_with_ttl() {
    let cache = MockRevocationCache::new();
    let token_id = TokenId::generate();

    cache.set(token_id, "payload", Duration::from_millis(20)).await.unwrap();
    assert_eq!(cache.get(token_id).await.unwrap().as_deref(), Some("payload"));

    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(cache.get(token_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_absence_and_failure_are_distinct() {
    let cache = MockRevocationCache::new();
    let token_id = TokenId::generate();

    assert!(cache.get(token_id).await.unwrap().is_none());

    cache.fail_gets(true);
    assert!(cache.get(token_id).await.is_err());
}

#[tokio::test]
async fn test_del_pair_counts_removed_entries() {
    let cache = MockRevocationCache::new();
    let refresh_id = TokenId::generate();
    let access_id = TokenId::generate();
    cache.set(refresh_id, "r", Duration::from_secs(60)).await.unwrap();

    assert_eq!(cache.del_pair(refresh_id, access_id).await.unwrap(), 1);
    assert_eq!(cache.del_pair(refresh_id, access_id).await.unwrap(), 0);
}
