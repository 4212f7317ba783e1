//! Session flows built from the token services

mod coordinator;


pub use coordinator::SessionRotationCoordinator;
