//! Shared configuration and common types for SessionKeep
//!
//! This crate provides functionality used across all workspace crates:
//! - Configuration types (JWT keys, cache, database, logging)
//! - The error response body handed to callers
//! - Utility functions (duration parsing)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, CleanupConfig, DatabaseConfig, Environment, JwtConfig,
    KeyPairConfig, LogFormat, LoggingConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use utils::duration;
