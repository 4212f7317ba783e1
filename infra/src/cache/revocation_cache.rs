//! Redis implementation of the RevocationCache trait.

use async_trait::async_trait;
use std::time::Duration;

use sk_core::domain::entities::TokenId;
use sk_core::errors::DomainError;
use sk_core::repositories::RevocationCache;
use sk_shared::CacheConfig;

use super::redis_client::RedisClient;

/// Revocation cache storing one Redis key per live token
///
/// Keys are `<prefix>:<token id>`; the value is the opaque payload written
/// at issuance and the Redis TTL matches the token lifetime.
#[derive(Clone)]
pub struct RedisRevocationCache {
    client: RedisClient,
}

impl RedisRevocationCache {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    /// Redis key for a token id
    pub fn key(&self, token_id: TokenId) -> String {
        token_key(self.client.config(), token_id)
    }
}

pub(crate) fn token_key(config: &CacheConfig, token_id: TokenId) -> String {
    config.make_key(&token_id.to_string())
}

#[async_trait]
impl RevocationCache for RedisRevocationCache {
    async fn set(&self, token_id: TokenId, payload: &str, ttl: Duration) -> Result<(), DomainError> {
        Ok(self.client.set_with_expiry(&self.key(token_id), payload, ttl).await?)
    }

    async fn get(&self, token_id: TokenId) -> Result<Option<String>, DomainError> {
        Ok(self.client.get(&self.key(token_id)).await?)
    }

    async fn del(&self, token_id: TokenId) -> Result<bool, DomainError> {
        Ok(self.client.delete(&self.key(token_id)).await?)
    }

    async fn del_pair(&self, refresh_token_id: TokenId, access_token_id: TokenId) -> Result<usize, DomainError> {
        Ok(self
            .client
            .delete_pair(&self.key(refresh_token_id), &self.key(access_token_id))
            .await?)
    }
}
