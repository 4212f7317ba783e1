//! Business services containing the token and session logic.

pub mod context;
pub mod session;
pub mod token;

pub use context::SessionContext;
pub use session::SessionRotationCoordinator;
pub use token::{
    CleanupResult, Rs256KeyManager, SessionCleanupService, TokenIssuer, TokenServiceConfig,
    TokenValidator,
};
