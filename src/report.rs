//! Console rendering of the matrix view. This module is the stand-in for
//! the dashboard renderer: it consumes only the read-only query surface
//! (plus raw `dates`/`names` access) and never touches ingestion state.

use {
    crate::{
        models::{Dataset, Metric, UserInfo},
        query,
        utils::DateUtils,
    },
    anyhow::Result,
    serde::Serialize,
    tabled::{Table, Tabled, settings::Style},
};

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Code")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Close")]
    close: String,
    #[tabled(rename = "Chg%")]
    change: String,
    #[tabled(rename = "Volume")]
    volume: String,
    #[tabled(rename = "PR")]
    price_rank: String,
    #[tabled(rename = "VR")]
    vol_rank: String,
    #[tabled(rename = "VH")]
    vol_high: String,
    #[tabled(rename = "Heat")]
    heat: String,
}

/// Machine-readable row for the `--json` collaborator output.
#[derive(Serialize)]
struct JsonRow<'a> {
    id: &'a str,
    name: &'a str,
    close: f64,
    change_pct: Option<f64>,
    volume: f64,
    price_rank: f64,
    vol_rank: f64,
    vol_high: &'a str,
    heat: String,
    close_window: &'a [f64],
}

/// Integer formatting with thousands separators, matching how the report
/// view prints volume.
fn format_thousands(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Day-change column: "--" is the distinct no-data state, never 0.00.
fn format_change(change: Option<f64>) -> String {
    match change {
        Some(pct) => format!("{pct:+.2}"),
        None => "--".to_string(),
    }
}

fn row(dataset: &Dataset, id: &str, base_index: usize) -> ReportRow {
    let vol_high = query::latest_vol_high(dataset, id);
    let price_rank = query::latest_value(dataset, id, Metric::PriceRank);

    ReportRow {
        id: id.to_string(),
        name: dataset.display_name(id).to_string(),
        close: format!("{:.2}", query::latest_value(dataset, id, Metric::Close)),
        change: format_change(query::percent_change(dataset, id, base_index)),
        volume: format_thousands(query::latest_value(dataset, id, Metric::Volume)),
        price_rank: format!("{}", price_rank.floor() as i64),
        vol_rank: format!(
            "{}",
            query::latest_value(dataset, id, Metric::VolRank).floor() as i64
        ),
        vol_high: if vol_high == "0" {
            "-".to_string()
        } else {
            vol_high.to_string()
        },
        heat: query::heat_color(price_rank).background_hex(),
    }
}

/// Header block shown above the table.
pub fn render_summary(dataset: &Dataset, shown: usize) -> String {
    format!(
        "Data date: {} ({} of {} ids)",
        DateUtils::display(dataset.latest_date().unwrap_or("-")),
        shown,
        dataset.instrument_count()
    )
}

/// The decoded license badge shown after a successful ingestion.
pub fn render_user_status(info: &UserInfo) -> String {
    format!(
        "USER ID {}  |  STATUS {}  |  EXPIRY {}",
        info.user_id,
        info.status,
        info.expiry_label()
    )
}

/// Render the matrix table for an already sorted/filtered id list.
pub fn render_table(dataset: &Dataset, ids: &[String], base_index: usize) -> String {
    let rows: Vec<ReportRow> = ids.iter().map(|id| row(dataset, id, base_index)).collect();
    Table::new(rows).with(Style::sharp()).to_string()
}

/// JSON form of the same view, plus a close-price window per id for
/// sparkline-style consumers.
pub fn render_json(
    dataset: &Dataset,
    ids: &[String],
    base_index: usize,
    window: usize,
) -> Result<String> {
    let rows: Vec<JsonRow> = ids
        .iter()
        .map(|id| JsonRow {
            id,
            name: dataset.display_name(id),
            close: query::latest_value(dataset, id, Metric::Close),
            change_pct: query::percent_change(dataset, id, base_index),
            volume: query::latest_value(dataset, id, Metric::Volume),
            price_rank: query::latest_value(dataset, id, Metric::PriceRank),
            vol_rank: query::latest_value(dataset, id, Metric::VolRank),
            vol_high: query::latest_vol_high(dataset, id),
            heat: query::heat_color(query::latest_value(dataset, id, Metric::PriceRank))
                .background_hex(),
            close_window: query::series_window(dataset, id, Metric::Close, window),
        })
        .collect();

    Ok(serde_json::to_string_pretty(&rows)?)
}
