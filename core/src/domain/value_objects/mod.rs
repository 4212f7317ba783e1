//! Value objects returned by the session flows.

pub mod session_outcome;

// Re-export commonly used types
pub use session_outcome::{Caller, DeviceLogoutOutcome, LoginResult, ValidatedRefresh};
