pub mod revocation;
pub mod session;

pub use revocation::RevocationCache;
pub use session::SessionRepository;

#[cfg(test)]
pub use revocation::MockRevocationCache;
#[cfg(test)]
pub use session::MockSessionRepository;
