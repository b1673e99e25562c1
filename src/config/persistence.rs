//! Snapshot persistence configuration

/// Configuration for durable Dataset snapshots
pub struct SnapshotPersistenceConfig {
    /// SQLite database file holding one snapshot row per category
    pub db_path: &'static str,
    /// Current version of the snapshot serialization format
    pub version: f64,
}

pub const PERSISTENCE: SnapshotPersistenceConfig = SnapshotPersistenceConfig {
    db_path: "rank_scope.sqlite",
    version: 1.0,
};
