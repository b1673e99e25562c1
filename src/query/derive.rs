//! Pure lookups and derivations over a Dataset. Misses are defined sentinel
//! returns (0.0, "0", empty slice, None) so renderers can branch without
//! exception handling; nothing here mutates or panics on short data.

use {
    crate::models::{Dataset, Metric, RangeFilter, SortDirection, SortKey},
    std::cmp::Ordering,
};

/// Newest value of a numeric series, 0.0 when the id or series is absent.
pub fn latest_value(dataset: &Dataset, id: &str, metric: Metric) -> f64 {
    value_at(dataset, id, metric, 0)
}

/// Value at an arbitrary date index, 0.0 when out of range.
pub fn value_at(dataset: &Dataset, id: &str, metric: Metric, date_index: usize) -> f64 {
    dataset
        .series(id)
        .and_then(|s| s.numeric(metric).get(date_index))
        .copied()
        .unwrap_or(0.0)
}

/// Newest volume-high marker. "0" means no signal; anything else is the
/// signal magnitude as the exporter wrote it.
pub fn latest_vol_high<'a>(dataset: &'a Dataset, id: &str) -> &'a str {
    dataset
        .series(id)
        .and_then(|s| s.vol_high.first())
        .map(String::as_str)
        .unwrap_or("0")
}

/// First `window` entries of a series (newest-first), fewer if shorter.
pub fn series_window<'a>(
    dataset: &'a Dataset,
    id: &str,
    metric: Metric,
    window: usize,
) -> &'a [f64] {
    match dataset.series(id) {
        Some(series) => {
            let column = series.numeric(metric);
            &column[..window.min(column.len())]
        }
        None => &[],
    }
}

/// Percent change of the newest close against the close at `base_index`.
///
/// Returns `None` (never zero) when close is absent, too short, or the
/// base value is zero; renderers show that as a distinct "no data" state,
/// not 0%.
pub fn percent_change(dataset: &Dataset, id: &str, base_index: usize) -> Option<f64> {
    let close = &dataset.series(id)?.close;
    let latest = *close.first()?;
    let base = *close.get(base_index)?;
    if base == 0.0 {
        return None;
    }
    Some((latest / base - 1.0) * 100.0)
}

fn sort_value(dataset: &Dataset, id: &str, key: SortKey) -> Option<f64> {
    match key {
        SortKey::Metric { metric, date_index } => dataset
            .series(id)
            .and_then(|s| s.numeric(metric).get(date_index))
            .copied(),
        SortKey::PercentChange { base_index } => percent_change(dataset, id, base_index),
    }
}

/// Stable sort of ids by a sort key. Ids with no value sink to the bottom
/// regardless of direction; ties keep their input order.
pub fn rank_sort(
    dataset: &Dataset,
    ids: &[String],
    key: SortKey,
    direction: SortDirection,
) -> Vec<String> {
    let mut ordered = ids.to_vec();
    ordered.sort_by(|a, b| {
        match (sort_value(dataset, a, key), sort_value(dataset, b, key)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(va), Some(vb)) => match direction {
                SortDirection::Ascending => va.partial_cmp(&vb),
                SortDirection::Descending => vb.partial_cmp(&va),
            }
            .unwrap_or(Ordering::Equal),
        }
    });
    ordered
}

/// Keep the ids whose latest metric value falls inside the filter.
pub fn filter_by_range(
    dataset: &Dataset,
    ids: &[String],
    metric: Metric,
    filter: RangeFilter,
) -> Vec<String> {
    ids.iter()
        .filter(|id| filter.contains(latest_value(dataset, id, metric)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::models::{Expiry, LicenseStatus, RawSeries, UserInfo},
        std::collections::HashMap,
    };

    fn fixture() -> Dataset {
        let mut data = HashMap::new();
        data.insert(
            "2330".to_string(),
            RawSeries {
                close: vec![605.0, 595.0, 585.0],
                price_rank: vec![98.0, 95.0, 90.0],
                vol_rank: vec![88.0, 70.0, 60.0],
                vol_high: vec!["600".to_string(), "0".to_string()],
                ..Default::default()
            },
        );
        data.insert(
            "2454".to_string(),
            RawSeries {
                close: vec![905.0],
                price_rank: vec![75.0, 74.0, 73.0],
                ..Default::default()
            },
        );
        data.insert(
            "1101".to_string(),
            RawSeries {
                close: vec![0.0, 35.0],
                price_rank: vec![75.0, 60.0],
                ..Default::default()
            },
        );

        Dataset {
            dates: vec![
                "20260212".to_string(),
                "20260211".to_string(),
                "20260210".to_string(),
            ],
            names: HashMap::new(),
            data,
            user_info: UserInfo {
                user_id: "90001".to_string(),
                status: LicenseStatus::Vip,
                expiry: Expiry::Permanent,
                is_expired: false,
            },
            updated_ms: 0,
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn latest_value_returns_index_zero_or_the_zero_sentinel() {
        let ds = fixture();
        assert_eq!(latest_value(&ds, "2330", Metric::PriceRank), 98.0);
        // Absent id and absent series both report 0.0, not an error.
        assert_eq!(latest_value(&ds, "9999", Metric::PriceRank), 0.0);
        assert_eq!(latest_value(&ds, "2330", Metric::Sma200), 0.0);
    }

    #[test]
    fn latest_vol_high_distinguishes_no_signal_from_magnitude() {
        let ds = fixture();
        assert_eq!(latest_vol_high(&ds, "2330"), "600");
        // No vol_high column parsed for this id.
        assert_eq!(latest_vol_high(&ds, "2454"), "0");
        assert_eq!(latest_vol_high(&ds, "9999"), "0");
    }

    #[test]
    fn series_window_clamps_to_available_data() {
        let ds = fixture();
        assert_eq!(series_window(&ds, "2330", Metric::Close, 2), &[605.0, 595.0]);
        assert_eq!(
            series_window(&ds, "2330", Metric::Close, 99),
            &[605.0, 595.0, 585.0]
        );
        assert!(series_window(&ds, "9999", Metric::Close, 10).is_empty());
        assert!(series_window(&ds, "2330", Metric::Volume, 10).is_empty());
    }

    #[test]
    fn percent_change_computes_against_an_arbitrary_base() {
        let ds = fixture();
        let change = percent_change(&ds, "2330", 2).unwrap();
        assert!((change - (605.0 / 585.0 - 1.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn percent_change_is_undefined_not_zero_or_nan() {
        let ds = fixture();
        // Series of length 1 with base index 1.
        assert_eq!(percent_change(&ds, "2454", 1), None);
        // Base index beyond the series propagates undefined, no clamping.
        assert_eq!(percent_change(&ds, "2330", 99), None);
        // Zero base value.
        assert_eq!(percent_change(&ds, "1101", 1).map(|c| c.is_nan()), Some(false));
        let mut ds = ds;
        ds.data.get_mut("1101").unwrap().close = vec![35.0, 0.0];
        assert_eq!(percent_change(&ds, "1101", 1), None);
        // Absent id.
        assert_eq!(percent_change(&ds, "9999", 1), None);
    }

    #[test]
    fn rank_sort_orders_by_metric_and_respects_direction() {
        let ds = fixture();
        let input = ids(&["2454", "2330", "1101"]);

        let desc = rank_sort(
            &ds,
            &input,
            SortKey::Metric {
                metric: Metric::PriceRank,
                date_index: 0,
            },
            SortDirection::Descending,
        );
        assert_eq!(desc, ids(&["2330", "2454", "1101"]));

        let asc = rank_sort(
            &ds,
            &input,
            SortKey::Metric {
                metric: Metric::PriceRank,
                date_index: 0,
            },
            SortDirection::Ascending,
        );
        assert_eq!(asc, ids(&["2454", "1101", "2330"]));
    }

    #[test]
    fn rank_sort_is_stable_on_ties() {
        let ds = fixture();
        // 2454 and 1101 share price_rank 75.0 at index 0.
        let input = ids(&["2454", "1101", "2330"]);
        let key = SortKey::Metric {
            metric: Metric::PriceRank,
            date_index: 0,
        };

        let desc = rank_sort(&ds, &input, key, SortDirection::Descending);
        assert_eq!(desc, ids(&["2330", "2454", "1101"]));

        let flipped = rank_sort(&ds, &ids(&["1101", "2454", "2330"]), key, SortDirection::Descending);
        assert_eq!(flipped, ids(&["2330", "1101", "2454"]));
    }

    #[test]
    fn rank_sort_sinks_missing_values_in_both_directions() {
        let ds = fixture();
        let input = ids(&["9999", "2330", "2454"]);
        let key = SortKey::PercentChange { base_index: 2 };

        // 2454 has a 1-long close so its change is undefined too; both
        // undefined ids trail the defined one whichever way we sort.
        let desc = rank_sort(&ds, &input, key, SortDirection::Descending);
        assert_eq!(desc, ids(&["2330", "9999", "2454"]));

        let asc = rank_sort(&ds, &input, key, SortDirection::Ascending);
        assert_eq!(asc, ids(&["2330", "9999", "2454"]));
    }

    #[test]
    fn filter_by_range_is_inclusive_with_optional_bounds() {
        let ds = fixture();
        let input = ids(&["2330", "2454", "1101"]);

        let filtered = filter_by_range(
            &ds,
            &input,
            Metric::PriceRank,
            RangeFilter {
                min: Some(75.0),
                max: Some(98.0),
            },
        );
        assert_eq!(filtered, ids(&["2330", "2454", "1101"]));

        let min_only = filter_by_range(
            &ds,
            &input,
            Metric::PriceRank,
            RangeFilter {
                min: Some(90.0),
                max: None,
            },
        );
        assert_eq!(min_only, ids(&["2330"]));
    }
}
