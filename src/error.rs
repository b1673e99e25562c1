use {chrono::NaiveDate, thiserror::Error};

/// All errors that can abort a snapshot ingestion.
///
/// Persistence failures are deliberately NOT part of this enum: a failed
/// durable write is logged and the in-memory pipeline continues, so those
/// surface as `anyhow::Error` inside the storage layer only. Lookup misses
/// in the query layer are sentinel returns, never errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("signature column not found: no line within the first {0} lines carries a TradeDate# marker")]
    MissingSignatureColumn(usize),

    #[error("license token malformed: {0}")]
    TokenFormat(String),

    #[error("file has a signature header but no data rows")]
    EmptyFile,

    #[error("unrecognized id '{0}': neither an instrument code nor a known group prefix")]
    UnknownCategory(String),

    #[error("anti-tamper check failed: computed signature {expected:04} but the token carries '{embedded}'")]
    SignatureMismatch { expected: u32, embedded: String },

    #[error("license expired on {}", .0.format("%Y/%m/%d"))]
    TokenExpired(NaiveDate),
}
