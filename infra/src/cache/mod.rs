//! Cache module for the Redis-backed revocation cache
//!
//! `RedisClient` wraps a multiplexed connection with retry logic;
//! `RedisRevocationCache` maps token ids to prefixed keys on top of it.

pub mod redis_client;
pub mod revocation_cache;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use revocation_cache::RedisRevocationCache;

// Re-export commonly used types
pub use sk_shared::CacheConfig;
