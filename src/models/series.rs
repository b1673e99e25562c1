use {
    crate::models::Metric,
    serde::{Deserialize, Serialize},
};

/// Column-vector series for one instrument or group, newest-first on the
/// Dataset's shared date axis. A column missing from the source file leaves
/// the matching field as an empty vec; unparseable cells become 0.0 at
/// parse time, so reads never need to re-validate.
///
/// `vol_high` stays string-typed: display logic distinguishes the literal
/// "0" (no signal) from numeric-looking magnitudes like "20" or "600".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    pub price_rank: Vec<f64>,
    pub vol_rank: Vec<f64>,
    pub sma20: Vec<f64>,
    pub sma50: Vec<f64>,
    pub sma150: Vec<f64>,
    pub sma200: Vec<f64>,
    pub vol_high: Vec<String>,
}

impl RawSeries {
    /// Borrow the numeric column selected by `metric`.
    pub fn numeric(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Open => &self.open,
            Metric::High => &self.high,
            Metric::Low => &self.low,
            Metric::Close => &self.close,
            Metric::Volume => &self.volume,
            Metric::PriceRank => &self.price_rank,
            Metric::VolRank => &self.vol_rank,
            Metric::Sma20 => &self.sma20,
            Metric::Sma50 => &self.sma50,
            Metric::Sma150 => &self.sma150,
            Metric::Sma200 => &self.sma200,
        }
    }

    /// Cap every column at the shared date-axis length. Validated once at
    /// parse time so array index i always means "the value on dates[i]".
    pub(crate) fn truncate_to(&mut self, len: usize) {
        self.open.truncate(len);
        self.high.truncate(len);
        self.low.truncate(len);
        self.close.truncate(len);
        self.volume.truncate(len);
        self.price_rank.truncate(len);
        self.vol_rank.truncate(len);
        self.sma20.truncate(len);
        self.sma50.truncate(len);
        self.sma150.truncate(len);
        self.sma200.truncate(len);
        self.vol_high.truncate(len);
    }
}
