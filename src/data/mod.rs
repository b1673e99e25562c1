mod hub;
mod parser;
mod store;
mod telemetry;

pub use {
    hub::{DatasetHub, IngestSummary},
    parser::{ParsedSnapshot, parse_snapshot},
    store::{SnapshotStorage, SqliteSnapshotStorage},
    telemetry::{HttpReporter, IngestAttempt, IngestReporter, NoopReporter},
};
