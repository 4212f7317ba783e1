//! Mock implementation of RevocationCache for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::domain::entities::TokenId;
use crate::errors::DomainError;

use super::r#trait::RevocationCache;

/// In-memory cache honouring TTLs, with failure injection
#[derive(Default)]
pub struct MockRevocationCache {
    entries: Arc<RwLock<HashMap<TokenId, (String, Instant)>>>,
    fail_sets: AtomicBool,
    fail_gets: AtomicBool,
    fail_dels: AtomicBool,
    set_calls: AtomicUsize,
    del_calls: AtomicUsize,
}

impl MockRevocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live payload under `token_id`, bypassing failure injection
    pub async fn peek(&self, token_id: TokenId) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(&token_id)
            .filter(|(_, deadline)| *deadline > Instant::now())
            .map(|(payload, _)| payload.clone())
    }

    pub async fn contains(&self, token_id: TokenId) -> bool {
        self.peek(token_id).await.is_some()
    }

    /// Overwrite an entry directly
    pub async fn put(&self, token_id: TokenId, payload: &str, ttl: Duration) {
        self.entries
            .write()
            .await
            .insert(token_id, (payload.to_string(), Instant::now() + ttl));
    }

    /// Drop an entry directly, as an eviction would
    pub async fn evict(&self, token_id: TokenId) {
        self.entries.write().await.remove(&token_id);
    }

    /// Remaining TTL of an entry
    pub async fn ttl(&self, token_id: TokenId) -> Option<Duration> {
        let entries = self.entries.read().await;
        entries
            .get(&token_id)
            .map(|(_, deadline)| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_dels(&self, fail: bool) {
        self.fail_dels.store(fail, Ordering::SeqCst);
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn del_calls(&self) -> usize {
        self.del_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RevocationCache for MockRevocationCache {
    async fn set(&self, token_id: TokenId, payload: &str, ttl: Duration) -> Result<(), DomainError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(DomainError::internal("mock cache unavailable"));
        }

        self.put(token_id, payload, ttl).await;
        Ok(())
    }

    async fn get(&self, token_id: TokenId) -> Result<Option<String>, DomainError> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(DomainError::internal("mock cache unavailable"));
        }

        Ok(self.peek(token_id).await)
    }

    async fn del(&self, token_id: TokenId) -> Result<bool, DomainError> {
        self.del_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_dels.load(Ordering::SeqCst) {
            return Err(DomainError::internal("mock cache unavailable"));
        }

        Ok(self.entries.write().await.remove(&token_id).is_some())
    }

    async fn del_pair(&self, refresh_token_id: TokenId, access_token_id: TokenId) -> Result<usize, DomainError> {
        self.del_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_dels.load(Ordering::SeqCst) {
            return Err(DomainError::internal("mock cache unavailable"));
        }

        let mut entries = self.entries.write().await;
        let removed = [refresh_token_id, access_token_id]
            .iter()
            .filter(|id| entries.remove(*id).is_some())
            .count();
        Ok(removed)
    }
}
