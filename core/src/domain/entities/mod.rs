//! Domain entities representing core business objects.

pub mod ids;
pub mod session;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use ids::{TokenId, UserId};
pub use session::{DeviceMeta, RefreshSession, SessionDescriptor, SessionStatus};
pub use token::{Claims, IssuedToken, TokenKind};
