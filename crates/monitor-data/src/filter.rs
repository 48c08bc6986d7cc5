//! Inclusive date-range filtering.

use chrono::NaiveDate;
use monitor_core::error::{MonitorError, Result};
use monitor_core::models::Dataset;
use monitor_core::time_utils::parse_query_date;
use tracing::debug;

/// An inclusive `[start, end]` window of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a window, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(MonitorError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse two strict `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_query_date(start)?, parse_query_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Rows of `dataset` dated within `[start, end]`, in their original order.
///
/// `start` and `end` must be `YYYY-MM-DD`. A window that matches nothing
/// yields an empty dataset; a reversed window is an error.
pub fn filter(dataset: &Dataset, start: &str, end: &str) -> Result<Dataset> {
    let range = DateRange::parse(start, end)?;
    Ok(filter_range(dataset, range))
}

/// [`filter`] with an already-validated window.
pub fn filter_range(dataset: &Dataset, range: DateRange) -> Dataset {
    let records = dataset
        .records
        .iter()
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect();
    let filtered = dataset.with_records(records);

    debug!(
        "Filter {}..={} kept {} of {} rows",
        range.start,
        range.end,
        filtered.len(),
        dataset.len()
    );
    filtered
}

// ── Tests ─────────────────────────────────────────────────────────────────────
