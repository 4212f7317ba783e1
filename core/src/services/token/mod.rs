//! Token services for RS256 JWT management
//!
//! - Access and refresh token issuing, with cache registration
//! - Validation against signature, expiry and cache liveness
//! - RS256 key loading for both key pairs
//! - Background sweep of expired session rows

mod cleanup;
mod config;
mod issuer;
mod key_manager;
mod validator;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, SessionCleanupService};
pub use config::TokenServiceConfig;
pub use issuer::TokenIssuer;
pub use key_manager::Rs256KeyManager;
pub use validator::TokenValidator;

#[cfg(test)]
pub(crate) use issuer::sign as sign_claims;
