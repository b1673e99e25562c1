//! Read-only derivation surface consumed by rendering code. Every function
//! borrows a Dataset and returns sentinels for misses, never errors.

mod derive;
mod heat;

pub use {
    derive::{
        filter_by_range, latest_value, latest_vol_high, percent_change, rank_sort, series_window,
        value_at,
    },
    heat::{HeatBucket, HeatStyle, heat_color},
};
