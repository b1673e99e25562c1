//! View parameter types consumed by the query layer. The core never owns
//! view state; renderers pass these in and get derived values back.

use {
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumIter, EnumString},
};

/// Numeric series selector. `VolHigh` is not here on purpose: it is
/// string-typed and read through its own accessor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Default,
)]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    Open,
    High,
    Low,
    Close,
    Volume,
    #[default]
    PriceRank,
    VolRank,
    Sma20,
    Sma50,
    Sma150,
    Sma200,
}

/// What a rank sort orders by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey {
    /// A metric value at a given index on the date axis (0 = latest).
    Metric { metric: Metric, date_index: usize },
    /// Percent change of close vs an arbitrary base date index.
    PercentChange { base_index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Default)]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Inclusive numeric filter; each bound is independently optional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |m| value >= m) && self.max.map_or(true, |m| value <= m)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_filter_bounds_are_inclusive_and_independent() {
        let both = RangeFilter {
            min: Some(50.0),
            max: Some(97.0),
        };
        assert!(both.contains(50.0));
        assert!(both.contains(97.0));
        assert!(!both.contains(97.1));

        let min_only = RangeFilter {
            min: Some(80.0),
            max: None,
        };
        assert!(min_only.contains(1000.0));
        assert!(!min_only.contains(79.9));

        assert!(RangeFilter::default().contains(f64::MIN));
    }
}
