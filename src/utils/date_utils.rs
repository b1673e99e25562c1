use chrono::NaiveDate;

pub struct DateUtils;

impl DateUtils {
    pub const COMPACT_FORMAT: &str = "%Y%m%d";
    pub const DISPLAY_FORMAT: &str = "%Y/%m/%d";

    /// Strip the separators a date cell may carry ("2026/02/12",
    /// "2026-02-12") down to bare digits.
    pub fn compact_digits(raw: &str) -> String {
        raw.chars().filter(|c| *c != '/' && *c != '-').collect()
    }

    /// Parse an 8-digit yyyymmdd string into a calendar date.
    pub fn parse_compact(yyyymmdd: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(yyyymmdd, Self::COMPACT_FORMAT).ok()
    }

    /// Human form of a compact date; unparseable input passes through as-is.
    pub fn display(yyyymmdd: &str) -> String {
        match Self::parse_compact(yyyymmdd) {
            Some(date) => date.format(Self::DISPLAY_FORMAT).to_string(),
            None => yyyymmdd.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_digits_strips_both_separator_styles() {
        assert_eq!(DateUtils::compact_digits("2026/02/12"), "20260212");
        assert_eq!(DateUtils::compact_digits("2026-02-12"), "20260212");
        assert_eq!(DateUtils::compact_digits("20260212"), "20260212");
    }

    #[test]
    fn display_round_trips_valid_dates_and_passes_garbage_through() {
        assert_eq!(DateUtils::display("20260212"), "2026/02/12");
        assert_eq!(DateUtils::display("99999999"), "99999999");
    }
}
