//! Session repository trait defining the interface for refresh session persistence.

use async_trait::async_trait;

use crate::domain::entities::{RefreshSession, TokenId, UserId};
use crate::errors::DomainError;

/// Repository trait for the durable record of refresh sessions
///
/// Rows are keyed by refresh token id and never updated. Every operation
/// touches rows independently, so concurrent calls for the same user need no
/// coordination beyond what the backing store provides.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session row
    ///
    /// # Arguments
    /// * `session` - The session to insert
    ///
    /// # Returns
    /// * `Ok(())` - Row inserted
    /// * `Err(DomainError::Conflict)` - A row with the same token id exists
    /// * `Err(DomainError)` - Store failure
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::{Duration, Utc};
    /// # use sk_core::domain::entities::{DeviceMeta, RefreshSession, TokenId, UserId};
    /// # use sk_core::repositories::SessionRepository;
    /// # async fn example(repo: &impl SessionRepository, user_id: UserId) -> Result<(), Box<dyn std::error::Error>> {
    /// let now = Utc::now();
    /// let session = RefreshSession {
    ///     token_id: TokenId::generate(),
    ///     user_id,
    ///     device: DeviceMeta::default(),
    ///     login_at: now,
    ///     expires_at: now + Duration::days(7),
    ///     access_token_id: TokenId::generate(),
    /// };
    ///
    /// repo.create(&session).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn create(&self, session: &RefreshSession) -> Result<(), DomainError>;

    /// Find a session by its refresh token id
    ///
    /// # Returns
    /// * `Ok(Some(RefreshSession))` - Row found
    /// * `Ok(None)` - No row with that id
    /// * `Err(DomainError)` - Store failure
    async fn find_by_token_id(&self, token_id: TokenId) -> Result<Option<RefreshSession>, DomainError>;

    /// List a user's sessions, newest first
    ///
    /// # Arguments
    /// * `user_id` - Owner of the sessions
    /// * `active_only` - Only rows whose expiry is still in the future
    async fn list(&self, user_id: UserId, active_only: bool) -> Result<Vec<RefreshSession>, DomainError>;

    /// Delete one row
    ///
    /// Idempotent: deleting an absent row is not an error.
    ///
    /// # Returns
    /// * `Ok(true)` - Row deleted
    /// * `Ok(false)` - Row was already absent
    async fn delete(&self, token_id: TokenId) -> Result<bool, DomainError>;

    /// Delete the user's rows whose expiry has passed
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows removed
    async fn delete_expired(&self, user_id: UserId) -> Result<usize, DomainError>;

    /// Delete every row whose expiry has passed
    async fn delete_all_expired(&self) -> Result<usize, DomainError>;

    /// Count a user's active sessions
    async fn count_active(&self, user_id: UserId) -> Result<usize, DomainError> {
        Ok(self.list(user_id, true).await?.len())
    }
}
