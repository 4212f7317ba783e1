//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis configuration for the revocation cache
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Prefix put in front of every token id key
    pub key_prefix: String,

    /// Maximum number of attempts for a retriable operation
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubles each attempt)
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            key_prefix: String::from("session"),
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let url = std::env::var("REDIS_URL").unwrap_or(defaults.url);
        let key_prefix = std::env::var("REDIS_KEY_PREFIX").unwrap_or(defaults.key_prefix);
        let max_retries = std::env::var("REDIS_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_retries);

        Self {
            url,
            key_prefix,
            max_retries,
            ..Default::default()
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key_with_prefix() {
        let config = CacheConfig::default().with_prefix("sk");
        assert_eq!(config.make_key("abc"), "sk:abc");
    }

    #[test]
    fn test_make_key_without_prefix() {
        let config = CacheConfig::default().with_prefix("");
        assert_eq!(config.make_key("abc"), "abc");
    }
}
