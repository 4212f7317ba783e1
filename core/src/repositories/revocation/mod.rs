pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

pub use r#trait::RevocationCache;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::MockRevocationCache;

#[cfg(test)]
mod tests;
