use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// All errors produced by the fund monitor.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not one the reader understands.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The file was readable but its contents could not be parsed.
    #[error("Malformed data in {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// A row's cell count differs from the header.
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// The header has no `Date` column.
    #[error("Dataset has no Date column")]
    MissingDateColumn,

    /// The file contains no header at all.
    #[error("No data found in {0}")]
    EmptyInput(PathBuf),

    /// A date value did not match any recognised format.
    ///
    /// `row` is the 1-based data row for values read from the dataset and
    /// `None` for query parameters.
    #[error("Invalid date format: {value:?}{}", row_suffix(.row))]
    InvalidDate { value: String, row: Option<usize> },

    /// The requested metric is not a column of the dataset.
    #[error("Metric '{0}' not found in the dataset")]
    UnknownMetric(String),

    /// The date column was requested as the metric.
    #[error("'{0}' is the date column, not a metric")]
    DateNotMetric(String),

    /// The query window ends before it starts.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" (row {r})"),
        None => String::new(),
    }
}

/// Coarse grouping of [`MonitorError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input file could not be loaded.
    Load,
    /// A date string could not be parsed.
    Format,
    /// The requested metric column does not exist.
    UnknownMetric,
    /// The query range is reversed.
    Range,
    /// Missing or invalid user-supplied configuration.
    Config,
    /// Anything else (terminal I/O, third-party failures).
    Io,
}

impl MonitorError {
    /// Shorthand for a [`MonitorError::InvalidDate`] raised by a query parameter.
    pub fn invalid_query_date(value: impl Into<String>) -> Self {
        MonitorError::InvalidDate {
            value: value.into(),
            row: None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MonitorError::FileRead { .. }
            | MonitorError::UnsupportedFormat(_)
            | MonitorError::Malformed { .. }
            | MonitorError::RaggedRow { .. }
            | MonitorError::MissingDateColumn
            | MonitorError::EmptyInput(_) => ErrorCategory::Load,
            MonitorError::InvalidDate { .. } => ErrorCategory::Format,
            MonitorError::UnknownMetric(_) | MonitorError::DateNotMetric(_) => {
                ErrorCategory::UnknownMetric
            }
            MonitorError::InvalidRange { .. } => ErrorCategory::Range,
            MonitorError::Config(_) => ErrorCategory::Config,
            MonitorError::Io(_) | MonitorError::Other(_) => ErrorCategory::Io,
        }
    }
}

/// Convenience alias used throughout the monitor crates.
pub type Result<T> = std::result::Result<T, MonitorError>;
