//! Results of the compound session operations.

use serde::Serialize;

use crate::domain::entities::{Claims, IssuedToken, SessionDescriptor, TokenId, UserId};

/// Both halves of a freshly opened session
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// A refresh token that passed signature, cache and subject checks
#[derive(Debug, Clone)]
pub struct ValidatedRefresh {
    pub claims: Claims,
    pub descriptor: SessionDescriptor,
}

impl ValidatedRefresh {
    pub fn token_id(&self) -> TokenId {
        self.claims.jti
    }

    pub fn user_id(&self) -> UserId {
        self.claims.sub
    }
}

/// The authenticated party behind a request, taken from its access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub access_token_id: TokenId,
}

impl From<&Claims> for Caller {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            access_token_id: claims.jti,
        }
    }
}

/// Outcome of revoking one of the caller's sessions by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceLogoutOutcome {
    /// The revoked session is the one the caller is using right now; the
    /// caller should drop its credentials and connection.
    pub revoked_current_session: bool,
}
