//! Revocation cache trait: the liveness authority for issued tokens.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::entities::TokenId;
use crate::errors::DomainError;

/// Fast key-value store whose key presence means "currently valid"
///
/// Entries are written once at issuance with a TTL equal to the token's
/// lifetime and removed on revocation. Absence must stay distinguishable
/// from a backend failure: `get` returns `Ok(None)` for the former and `Err`
/// for the latter.
#[async_trait]
pub trait RevocationCache: Send + Sync {
    /// Store `payload` under `token_id` for `ttl`
    ///
    /// # Example
    /// ```no_run
    /// # use std::time::Duration;
    /// # use sk_core::domain::entities::TokenId;
    /// # use sk_core::repositories::RevocationCache;
    /// # async fn example(cache: &impl RevocationCache) -> Result<(), Box<dyn std::error::Error>> {
    /// let token_id = TokenId::generate();
    /// cache.set(token_id, "user-id", Duration::from_secs(900)).await?;
    ///
    /// assert!(cache.get(token_id).await?.is_some());
    /// # Ok(())
    /// # }
    /// ```
    async fn set(&self, token_id: TokenId, payload: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Fetch the payload stored under `token_id`
    ///
    /// # Returns
    /// * `Ok(Some(String))` - Entry is live
    /// * `Ok(None)` - Entry expired or was revoked
    /// * `Err(DomainError)` - Backend failure
    async fn get(&self, token_id: TokenId) -> Result<Option<String>, DomainError>;

    /// Remove one entry
    ///
    /// # Returns
    /// * `Ok(true)` - Entry removed
    /// * `Ok(false)` - Entry was already absent
    async fn del(&self, token_id: TokenId) -> Result<bool, DomainError>;

    /// Remove both entries of a session in a single batched round trip
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of entries that existed and were removed
    async fn del_pair(&self, refresh_token_id: TokenId, access_token_id: TokenId) -> Result<usize, DomainError>;
}
