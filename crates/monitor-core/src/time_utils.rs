use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::{MonitorError, Result};

// ── Data-cell dates ───────────────────────────────────────────────────────────

/// Date-time patterns tried after the plain date forms. The time of day is
/// always discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only patterns. Slash-separated day/month forms are read month-first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%Y%m%d"];

/// Parse a dataset `Date` cell into a calendar date.
///
/// Handles:
/// * plain dates (`2023-01-05`, `2023/01/05`, `01/05/2023`, `05-Jan-2023`,
///   `20230105`)
/// * naive date-times (`2023-01-05 13:45:00`, `2023-01-05T13:45:00.250`)
/// * RFC 3339 with an offset, keeping the date as written in the string
///
/// Returns `None` for empty strings or unrecognised formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.date());
        }
    }

    // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
    let normalised = match s.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => s.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalised)
        .ok()
        .map(|dt| dt.date_naive())
}

// ── Query dates ───────────────────────────────────────────────────────────────

fn query_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex"))
}

/// Parse a query parameter that must be exactly `YYYY-MM-DD`.
///
/// Unlike [`parse_date`], no other layout is accepted, and the value must be a
/// real calendar day (`2023-02-30` is rejected).
pub fn parse_query_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if !query_date_pattern().is_match(trimmed) {
        return Err(MonitorError::invalid_query_date(s));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| MonitorError::invalid_query_date(s))
}

/// Render a date the way query parameters and normalised tables expect it.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(parse_date("2023-01-05"), Some(ymd(2023, 1, 5)));
    }

    #[test]
    fn test_parse_date_trims_whitespace() {
        assert_eq!(parse_date("  2023-01-05 "), Some(ymd(2023, 1, 5)));
    }

    #[test]
    fn test_parse_date_slashes() {
        assert_eq!(parse_date("2023/01/05"), Some(ymd(2023, 1, 5)));
        assert_eq!(parse_date("01/05/2023"), Some(ymd(2023, 1, 5)));
    }

    #[test]
    fn test_parse_date_month_name_and_compact() {
        assert_eq!(parse_date("05-Jan-2023"), Some(ymd(2023, 1, 5)));
        assert_eq!(parse_date("20230105"), Some(ymd(2023, 1, 5)));
    }

    #[test]
    fn test_parse_date_drops_time_of_day() {
        assert_eq!(parse_date("2023-01-05 23:59:59"), Some(ymd(2023, 1, 5)));
        assert_eq!(parse_date("2023-01-05T08:30:00.5"), Some(ymd(2023, 1, 5)));
    }

    #[test]
    fn test_parse_date_rfc3339_keeps_written_date() {
        assert_eq!(parse_date("2023-01-31T23:00:00-05:00"), Some(ymd(2023, 1, 31)));
        assert_eq!(parse_date("2023-01-31T23:00:00Z"), Some(ymd(2023, 1, 31)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2023-02-30"), None);
    }

    #[test]
    fn test_parse_query_date_valid() {
        assert_eq!(parse_query_date("2023-02-28").unwrap(), ymd(2023, 2, 28));
    }

    #[test]
    fn test_parse_query_date_rejects_other_layouts() {
        for bad in ["2023/02/28", "02/28/2023", "2023-2-28", "20230228", ""] {
            let err = parse_query_date(bad).unwrap_err();
            assert!(
                matches!(err, MonitorError::InvalidDate { row: None, .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_query_date_rejects_impossible_day() {
        assert!(parse_query_date("2023-02-30").is_err());
        assert!(parse_query_date("2023-13-01").is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2024, 3, 9)), "2024-03-09");
    }
}
