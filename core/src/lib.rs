//! # SessionKeep Core
//!
//! Token and session lifecycle engine. This crate contains the domain
//! entities, the repository interfaces for the durable session store and the
//! revocation cache, the RS256 token issuer and validator, and the
//! coordinator that composes them into login, refresh and logout flows.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Claims, DeviceMeta, IssuedToken, RefreshSession, SessionDescriptor, SessionStatus, TokenId, TokenKind, UserId,
};
pub use domain::value_objects::{Caller, DeviceLogoutOutcome, LoginResult, ValidatedRefresh};
pub use errors::{DomainError, DomainResult, ErrorKind, TokenError};
pub use repositories::{RevocationCache, SessionRepository};
pub use services::{
    CleanupResult, Rs256KeyManager, SessionCleanupService, SessionContext, SessionRotationCoordinator,
    TokenIssuer, TokenServiceConfig, TokenValidator,
};

#[cfg(test)]
pub(crate) mod test_support;
