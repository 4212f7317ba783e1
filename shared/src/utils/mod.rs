//! Utility functions shared across crates

pub mod duration;
