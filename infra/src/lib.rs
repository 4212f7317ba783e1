//! # Infrastructure Layer
//!
//! Concrete backends for the SessionKeep core:
//! - **Cache**: Redis revocation cache with retry and pipelined pair deletes
//! - **Database**: MySQL session store using SQLx, with migrations
//! - **Context**: wiring of keys, cache and store into a `SessionContext`

use sk_core::errors::DomainError;

/// Cache module - Redis client and revocation cache
pub mod cache;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Context module - Builds the shared session context from configuration
pub mod context;

pub use cache::{RedisClient, RedisRevocationCache};
pub use context::{Infrastructure, SessionKeepContext};
pub use database::{DatabasePool, MySqlSessionRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
