//! Parser for the broker's percentile-rank CSV export.
//!
//! The format is not RFC-4180: each series cell packs one value per trading
//! day, slash-separated and newest-first, and the header hides a license
//! token in a column starting with `TradeDate#`. Cells are split manually
//! (comma, trim, strip quotes) the same way the exporter writes them.
//!
//! The caller hands us already-decoded text; transcoding the broker's
//! legacy regional encoding is a pre-processing step outside this module.

use {
    crate::{
        config::constants::{
            EXCHANGE_SUFFIX, HEADER_SCAN_WINDOW, ID_COLUMN_INDEX, MIN_ROW_FIELDS,
            NAME_COLUMN_INDEX, SIGNATURE_PREFIX, columns,
        },
        domain::Category,
        error::IngestError,
        models::RawSeries,
    },
    itertools::Itertools,
    std::collections::HashMap,
};

/// Raw parse output: everything the verification gate and the hub need to
/// finish building a Dataset. The license token is still encoded here; the
/// parser never judges it.
#[derive(Debug, Clone)]
pub struct ParsedSnapshot {
    pub category: Category,
    /// Full signature-column header cell, `TradeDate#...`.
    pub token: String,
    /// Shared date axis, newest-first.
    pub dates: Vec<String>,
    pub names: HashMap<String, String>,
    pub data: HashMap<String, RawSeries>,
}

/// Column positions resolved once from the header row. A name missing from
/// the header resolves to None and yields empty series, never an error.
struct ColumnMap {
    signature: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    volume: Option<usize>,
    price_rank: Option<usize>,
    vol_rank: Option<usize>,
    sma20: Option<usize>,
    sma50: Option<usize>,
    sma150: Option<usize>,
    sma200: Option<usize>,
    vol_high: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Result<Self, IngestError> {
        let signature = headers
            .iter()
            .position(|h| h.starts_with(SIGNATURE_PREFIX))
            .ok_or(IngestError::MissingSignatureColumn(HEADER_SCAN_WINDOW))?;

        let named = |name: &str| headers.iter().position(|h| h == name);

        Ok(Self {
            signature,
            open: named(columns::OPEN),
            high: named(columns::HIGH),
            low: named(columns::LOW),
            close: named(columns::CLOSE),
            volume: named(columns::VOLUME),
            price_rank: named(columns::PRICE_RANK),
            vol_rank: named(columns::VOL_RANK),
            sma20: named(columns::SMA20),
            sma50: named(columns::SMA50),
            sma150: named(columns::SMA150),
            sma200: named(columns::SMA200),
            vol_high: named(columns::VOL_HIGH),
        })
    }
}

/// Split a raw line into trimmed, quote-stripped cells.
fn split_fields(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().replace('"', ""))
        .collect()
}

/// Slash-packed numeric cell -> one value per date, non-numeric -> 0.0.
fn parse_numeric_cell(fields: &[String], index: Option<usize>) -> Vec<f64> {
    let Some(cell) = index.and_then(|i| fields.get(i)) else {
        return Vec::new();
    };
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split('/')
        .map(|v| v.trim().parse().unwrap_or(0.0))
        .collect()
}

/// Slash-packed string cell, kept verbatim (used for the VolHigh marker).
fn parse_string_cell(fields: &[String], index: Option<usize>) -> Vec<String> {
    let Some(cell) = index.and_then(|i| fields.get(i)) else {
        return Vec::new();
    };
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split('/').map(|v| v.trim().to_string()).collect()
}

/// Parse one export file into its candidate snapshot.
pub fn parse_snapshot(text: &str) -> Result<ParsedSnapshot, IngestError> {
    let lines: Vec<&str> = text.lines().collect();

    // Locate the header: first line in the scan window carrying the marker.
    let (header_index, header_line) = lines
        .iter()
        .take(HEADER_SCAN_WINDOW)
        .find_position(|line| line.contains(SIGNATURE_PREFIX))
        .ok_or(IngestError::MissingSignatureColumn(HEADER_SCAN_WINDOW))?;

    let headers = split_fields(header_line);
    let columns = ColumnMap::resolve(&headers)?;
    let token = headers[columns.signature].clone();

    // The first data row anchors category detection and the shared date
    // axis (its signature-column cell lists every date in the file).
    let first_row = lines
        .get(header_index + 1)
        .map(|line| split_fields(line))
        .filter(|fields| fields.len() > columns.signature.max(ID_COLUMN_INDEX))
        .ok_or(IngestError::EmptyFile)?;

    let category = Category::detect(&first_row[ID_COLUMN_INDEX])?;
    let dates: Vec<String> = first_row[columns.signature]
        .split('/')
        .map(|d| d.trim().to_string())
        .collect();

    let mut names = HashMap::new();
    let mut data = HashMap::new();

    for line in &lines[header_index + 1..] {
        let fields = split_fields(line);
        if fields.len() < MIN_ROW_FIELDS {
            continue; // tolerates trailing blanks and ragged footer rows
        }

        let id = fields[ID_COLUMN_INDEX]
            .strip_suffix(EXCHANGE_SUFFIX)
            .unwrap_or(&fields[ID_COLUMN_INDEX])
            .to_string();
        let name = fields[NAME_COLUMN_INDEX].clone();
        if id.is_empty() || name.is_empty() {
            continue;
        }

        let mut series = RawSeries {
            open: parse_numeric_cell(&fields, columns.open),
            high: parse_numeric_cell(&fields, columns.high),
            low: parse_numeric_cell(&fields, columns.low),
            close: parse_numeric_cell(&fields, columns.close),
            volume: parse_numeric_cell(&fields, columns.volume),
            price_rank: parse_numeric_cell(&fields, columns.price_rank),
            vol_rank: parse_numeric_cell(&fields, columns.vol_rank),
            sma20: parse_numeric_cell(&fields, columns.sma20),
            sma50: parse_numeric_cell(&fields, columns.sma50),
            sma150: parse_numeric_cell(&fields, columns.sma150),
            sma200: parse_numeric_cell(&fields, columns.sma200),
            vol_high: parse_string_cell(&fields, columns.vol_high),
        };
        series.truncate_to(dates.len());

        names.insert(id.clone(), name);
        data.insert(id, series);
    }

    log::debug!(
        "parsed {} snapshot: {} ids over {} dates",
        category,
        data.len(),
        dates.len()
    );

    Ok(ParsedSnapshot {
        category,
        token,
        dates,
        names,
        data,
    })
}
