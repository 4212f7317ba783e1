//! Mock implementation of SessionRepository for testing

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{RefreshSession, TokenId, UserId};
use crate::errors::DomainError;

use super::r#trait::SessionRepository;

/// In-memory session repository with failure injection
#[derive(Default)]
pub struct MockSessionRepository {
    sessions: Arc<RwLock<HashMap<TokenId, RefreshSession>>>,
    conflicts_remaining: AtomicUsize,
    fail_creates: AtomicBool,
    fail_deletes: AtomicBool,
    fail_sweeps: AtomicBool,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    sweep_calls: AtomicUsize,
}

impl MockSessionRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row without going through `create`
    pub async fn insert(&self, session: RefreshSession) {
        self.sessions.write().await.insert(session.token_id, session);
    }

    pub async fn get(&self, token_id: TokenId) -> Option<RefreshSession> {
        self.sessions.read().await.get(&token_id).cloned()
    }

    pub async fn contains(&self, token_id: TokenId) -> bool {
        self.sessions.read().await.contains_key(&token_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Make the next `count` creates report a duplicate key
    pub fn inject_conflicts(&self, count: usize) {
        self.conflicts_remaining.store(count, Ordering::SeqCst);
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sweeps(&self, fail: bool) {
        self.fail_sweeps.store(fail, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn sweep_calls(&self) -> usize {
        self.sweep_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn create(&self, session: &RefreshSession) -> Result<(), DomainError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(DomainError::internal("mock store unavailable"));
        }

        let injected = self
            .conflicts_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        let mut sessions = self.sessions.write().await;
        if injected || sessions.contains_key(&session.token_id) {
            return Err(DomainError::Conflict {
                resource: format!("session {}", session.token_id),
            });
        }

        sessions.insert(session.token_id, session.clone());
        Ok(())
    }

    async fn find_by_token_id(&self, token_id: TokenId) -> Result<Option<RefreshSession>, DomainError> {
        Ok(self.sessions.read().await.get(&token_id).cloned())
    }

    async fn list(&self, user_id: UserId, active_only: bool) -> Result<Vec<RefreshSession>, DomainError> {
        let now = Utc::now();
        let sessions = self.sessions.read().await;
        let mut listed: Vec<RefreshSession> = sessions
            .values()
            .filter(|s| s.user_id == user_id && (!active_only || s.expires_at > now))
            .cloned()
            .collect();

        listed.sort_by(|a, b| b.token_id.cmp(&a.token_id));
        Ok(listed)
    }

    async fn delete(&self, token_id: TokenId) -> Result<bool, DomainError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DomainError::internal("mock store unavailable"));
        }

        Ok(self.sessions.write().await.remove(&token_id).is_some())
    }

    async fn delete_expired(&self, user_id: UserId) -> Result<usize, DomainError> {
        self.sweep_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_sweeps.load(Ordering::SeqCst) {
            return Err(DomainError::internal("mock store unavailable"));
        }

        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !(s.user_id == user_id && s.expires_at <= now));
        Ok(before - sessions.len())
    }

    async fn delete_all_expired(&self) -> Result<usize, DomainError> {
        self.sweep_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_sweeps.load(Ordering::SeqCst) {
            return Err(DomainError::internal("mock store unavailable"));
        }

        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        Ok(before - sessions.len())
    }
}
