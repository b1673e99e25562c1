//! Configuration module for the rank-scope application.

mod persistence;

// Public
pub mod constants;

// Re-export commonly used items
pub use persistence::{PERSISTENCE, SnapshotPersistenceConfig};
