//! Domain-specific error types and error handling.

mod types;


pub use types::{ErrorKind, TokenError};

use sk_shared::{ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// Duplicate key reported by the session store
    #[error("Conflict: {resource} already exists")]
    Conflict { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Shorthand for an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// The taxonomy bucket this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::BadRequest { .. } => ErrorKind::BadRequest,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Unauthorized => ErrorKind::Unauthorized,
            DomainError::SessionExpired => ErrorKind::SessionExpired,
            DomainError::Conflict { .. } | DomainError::Internal { .. } => ErrorKind::Internal,
            DomainError::Token(token) => match token {
                TokenError::Malformed => ErrorKind::Malformed,
                TokenError::Expired => ErrorKind::Expired,
                TokenError::Unauthorized => ErrorKind::Unauthorized,
                TokenError::KeyUnavailable { .. } | TokenError::SigningFailed { .. } => {
                    ErrorKind::Internal
                }
            },
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.kind(), ErrorKind::Expired | ErrorKind::SessionExpired)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        let kind = self.kind();
        // Backend details stay in the logs.
        let message = match kind {
            ErrorKind::Internal => "Internal server error".to_string(),
            _ => self.to_string(),
        };
        ErrorResponse::new(kind.code(), message)
    }
}
