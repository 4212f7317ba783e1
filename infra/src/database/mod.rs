//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and embedded migrations
//! - The session repository over the `sessions` table

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlSessionRepository;
