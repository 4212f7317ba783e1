//! Configuration for token issuing and validation

use std::time::Duration;

use sk_shared::config::auth::{
    JwtConfig, DEFAULT_ACCESS_TOKEN_EXPIRY_SECS, DEFAULT_REFRESH_TOKEN_EXPIRY_SECS,
};

/// Claim values and lifetimes shared by the issuer and the validator
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// `iss` claim written and required
    pub issuer: String,
    /// `aud` claim written and required
    pub audience: String,
    /// Clock skew tolerance in seconds for nbf; exp is never extended
    pub leeway_seconds: u64,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            issuer: "sessionkeep".to_string(),
            audience: "sessionkeep-api".to_string(),
            leeway_seconds: 0,
            access_ttl: Duration::from_secs(DEFAULT_ACCESS_TOKEN_EXPIRY_SECS),
            refresh_ttl: Duration::from_secs(DEFAULT_REFRESH_TOKEN_EXPIRY_SECS),
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            leeway_seconds: config.leeway,
            access_ttl: config.access_ttl(),
            refresh_ttl: config.refresh_ttl(),
        }
    }
}
