//! Token-level error types and the coarse error taxonomy callers branch on

use thiserror::Error;

/// Token-related errors
///
/// Raised by the issuer and validator. `Expired` and `Unauthorized` are kept
/// apart: the first means "refresh silently", the second "sign in again".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token expired")]
    Expired,

    #[error("Token revoked or unknown")]
    Unauthorized,

    #[error("Signing key unavailable: {message}")]
    KeyUnavailable { message: String },

    #[error("Token signing failed: {message}")]
    SigningFailed { message: String },
}

/// Error classification exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad signature or structure
    Malformed,
    /// Signed expiry of an access token has passed
    Expired,
    /// Signed expiry of a refresh token has passed; re-authentication required
    SessionExpired,
    /// Revoked, unknown, or not owned by the caller
    Unauthorized,
    /// Session row absent
    NotFound,
    /// Stale or otherwise unusable request input
    BadRequest,
    /// Store, cache or signing backend failure
    Internal,
}

impl ErrorKind {
    /// Stable error code for the kind
    pub fn code(&self) -> &'static str {
        use sk_shared::error_codes;

        match self {
            ErrorKind::Malformed => error_codes::TOKEN_MALFORMED,
            ErrorKind::Expired => error_codes::TOKEN_EXPIRED,
            ErrorKind::SessionExpired => error_codes::SESSION_EXPIRED,
            ErrorKind::Unauthorized => error_codes::UNAUTHORIZED,
            ErrorKind::NotFound => error_codes::NOT_FOUND,
            ErrorKind::BadRequest => error_codes::BAD_REQUEST,
            ErrorKind::Internal => error_codes::INTERNAL_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
