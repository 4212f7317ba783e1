//! Token signing and session lifetime configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::duration::duration_from_env;

/// Default access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_SECS: u64 = 900;

/// Default refresh token lifetime (7 days)
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_SECS: u64 = 604_800;

/// Where to find one RS256 key pair.
///
/// Inline keys are base64-encoded PEM documents and win over paths. A
/// deployment that only validates tokens may leave the private key out.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyPairConfig {
    /// Base64-encoded PEM private key
    pub private_key: Option<String>,

    /// Base64-encoded PEM public key
    pub public_key: Option<String>,

    /// Path to a PEM private key file
    pub private_key_path: Option<String>,

    /// Path to a PEM public key file
    pub public_key_path: Option<String>,
}

impl KeyPairConfig {
    /// Read `{PREFIX}_PRIVATE_KEY`, `{PREFIX}_PUBLIC_KEY` and their `_PATH` variants
    pub fn from_env(prefix: &str) -> Self {
        let var = |suffix: &str| {
            std::env::var(format!("{}_{}", prefix, suffix))
                .ok()
                .filter(|v| !v.trim().is_empty())
        };

        Self {
            private_key: var("PRIVATE_KEY"),
            public_key: var("PUBLIC_KEY"),
            private_key_path: var("PRIVATE_KEY_PATH"),
            public_key_path: var("PUBLIC_KEY_PATH"),
        }
    }

    /// Whether a private key source is configured
    pub fn can_sign(&self) -> bool {
        self.private_key.is_some() || self.private_key_path.is_some()
    }
}

/// JWT configuration for the access/refresh token pair
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Access token key pair
    pub access: KeyPairConfig,

    /// Refresh token key pair
    pub refresh: KeyPairConfig,

    /// Access token expiry time in seconds
    pub access_token_expiry: u64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: u64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Clock skew tolerance in seconds when checking nbf
    pub leeway: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access: KeyPairConfig::default(),
            refresh: KeyPairConfig::default(),
            access_token_expiry: DEFAULT_ACCESS_TOKEN_EXPIRY_SECS,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY_SECS,
            issuer: String::from("sessionkeep"),
            audience: String::from("sessionkeep-api"),
            leeway: 0,
        }
    }
}

impl JwtConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            access: KeyPairConfig::from_env("ACCESS_TOKEN"),
            refresh: KeyPairConfig::from_env("REFRESH_TOKEN"),
            access_token_expiry: duration_from_env(
                "ACCESS_TOKEN_EXPIRED_IN",
                Duration::from_secs(defaults.access_token_expiry),
            )
            .as_secs(),
            refresh_token_expiry: duration_from_env(
                "REFRESH_TOKEN_EXPIRED_IN",
                Duration::from_secs(defaults.refresh_token_expiry),
            )
            .as_secs(),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            leeway: std::env::var("JWT_LEEWAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.leeway),
        }
    }

    /// Access token lifetime
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_expiry)
    }

    /// Refresh token lifetime
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_expiry)
    }
}

/// Background sweep of expired session rows
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Whether the periodic sweep runs at all
    pub enabled: bool,

    /// Seconds between sweeps
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 3600,
        }
    }
}

impl CleanupConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            enabled: std::env::var("SESSION_CLEANUP_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enabled),
            interval_seconds: duration_from_env(
                "SESSION_CLEANUP_INTERVAL",
                Duration::from_secs(defaults.interval_seconds),
            )
            .as_secs(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Expired session cleanup
    pub cleanup: CleanupConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            cleanup: CleanupConfig::from_env(),
        }
    }
}
