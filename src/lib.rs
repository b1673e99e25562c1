// Core modules
pub mod codec;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod models;
pub mod query;
pub mod report;
pub mod utils;

// Re-export commonly used types outside of crate (for the binaries)
pub use crate::data::{
    DatasetHub, HttpReporter, IngestReporter, NoopReporter, SnapshotStorage, SqliteSnapshotStorage,
};
pub use crate::domain::Category;
pub use crate::error::IngestError;
pub use crate::models::{Dataset, Metric, RangeFilter, RawSeries, SortDirection, SortKey, UserInfo};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Snapshot CSV to ingest; omit to render the last persisted dataset
    pub file: Option<std::path::PathBuf>,

    /// Which category to render when no file is given
    #[arg(long, default_value = "stock")]
    pub category: Category,

    /// Metric used for sorting and range filtering
    #[arg(long, default_value = "price_rank")]
    pub metric: Metric,

    /// Sort by percent change instead of the metric value
    #[arg(long, default_value_t = false)]
    pub sort_change: bool,

    /// Sort ascending (default is descending)
    #[arg(long, default_value_t = false)]
    pub asc: bool,

    /// Inclusive lower bound on the latest metric value
    #[arg(long)]
    pub min: Option<f64>,

    /// Inclusive upper bound on the latest metric value
    #[arg(long)]
    pub max: Option<f64>,

    /// Base date index for the change column (1 = previous trading day)
    #[arg(long, default_value_t = 1)]
    pub base_index: usize,

    /// Close-price window length included in --json output
    #[arg(long, default_value_t = 20)]
    pub window: usize,

    /// Show at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,

    /// Emit the view as JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Snapshot database path (defaults to the built-in location)
    #[arg(long)]
    pub db: Option<String>,

    /// Optional endpoint for fire-and-forget ingestion telemetry
    #[arg(long)]
    pub report_url: Option<String>,

    /// Wipe all persisted snapshots and exit
    #[arg(long, default_value_t = false)]
    pub reset: bool,
}
