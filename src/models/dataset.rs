use {
    crate::models::{RawSeries, UserInfo},
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

/// One fully ingested snapshot for a single category (instruments OR
/// groups). Immutable after construction: a re-ingestion builds a fresh
/// Dataset and the hub swaps the reference atomically.
///
/// `dates` is the single shared axis, newest-first; index i of every series
/// in `data` means "the value on dates[i]".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dates: Vec<String>,
    pub names: HashMap<String, String>,
    pub data: HashMap<String, RawSeries>,
    pub user_info: UserInfo,
    /// Ingestion wall-clock provenance (epoch ms).
    pub updated_ms: i64,
}

impl Dataset {
    /// Most recent trading day in the file, if any.
    pub fn latest_date(&self) -> Option<&str> {
        self.dates.first().map(String::as_str)
    }

    pub fn series(&self, id: &str) -> Option<&RawSeries> {
        self.data.get(id)
    }

    /// Display name for an id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.names.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn instrument_count(&self) -> usize {
        self.data.len()
    }
}
