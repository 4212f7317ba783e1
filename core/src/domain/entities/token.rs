//! Token entities for JWT-based sessions.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{TokenId, UserId};

/// Which half of a session a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: UserId,

    /// JWT ID, also the revocation cache key
    pub jti: TokenId,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Access or refresh
    pub kind: TokenKind,

    /// Refresh only: access token minted alongside this refresh token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_id: Option<TokenId>,
}

impl Claims {
    /// Creates claims for an access token
    ///
    /// # Arguments
    ///
    /// * `user_id` - Subject of the token
    /// * `token_id` - Fresh token id
    /// * `issued_at` - Issuance instant, also used for `nbf`
    /// * `expires_at` - Signed expiry
    /// * `issuer` / `audience` - Values checked again at validation
    pub fn new_access(
        user_id: UserId,
        token_id: TokenId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self {
            sub: user_id,
            jti: token_id,
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            kind: TokenKind::Access,
            access_token_id: None,
        }
    }

    /// Creates claims for a refresh token linked to `access_token_id`
    pub fn new_refresh(
        user_id: UserId,
        token_id: TokenId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        issuer: &str,
        audience: &str,
        access_token_id: TokenId,
    ) -> Self {
        Self {
            kind: TokenKind::Refresh,
            access_token_id: Some(access_token_id),
            ..Self::new_access(user_id, token_id, issued_at, expires_at, issuer, audience)
        }
    }

    /// Signed expiry as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// A freshly signed token and the metadata callers need to hand it out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded JWT
    pub token: String,
    /// Id embedded as `jti`
    pub token_id: TokenId,
    /// Signed expiry
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Seconds until expiry, as a client would put in `expires_in`
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}
