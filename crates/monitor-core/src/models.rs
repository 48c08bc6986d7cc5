use std::fmt;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::time_utils::format_date;

/// Name of the mandatory date column.
pub const DATE_COLUMN: &str = "Date";

/// Cell spellings treated as a missing value.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "-"];

// ── RawTable ──────────────────────────────────────────────────────────────────

/// Untyped rows exactly as read from disk.
///
/// Every row holds one string cell per header column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of the `Date` column, if present.
    pub fn date_index(&self) -> Option<usize> {
        self.columns.iter().position(|c| c == DATE_COLUMN)
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// Thousands grouping such as `1,250.75`. Any other comma makes a cell text.
fn grouped_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").expect("static regex"))
}

/// A single metric value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Classify a raw string as a number, free text or a missing marker.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_MARKERS.contains(&trimmed) {
            return Cell::Missing;
        }
        let parsed = if !trimmed.contains(',') {
            trimmed.parse::<f64>()
        } else if grouped_number_pattern().is_match(trimmed) {
            trimmed.replace(',', "").parse::<f64>()
        } else {
            return Cell::Text(trimmed.to_string());
        };
        match parsed {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    /// Numeric value, or `None` for text and missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Render back to the raw string form accepted by [`Cell::parse`].
    pub fn to_raw(&self) -> String {
        match self {
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Missing => String::new(),
        }
    }
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Date,
    /// Every non-missing cell is numeric.
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Column layout of a [`Dataset`], validated once at load time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// All columns, `Date` included, in file order.
    pub columns: Vec<Column>,
    /// Position of `Date` within `columns`.
    pub date_index: usize,
}

impl Schema {
    /// Column names in their original order.
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Every column except `Date`, in file order.
    pub fn metric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.date_index)
            .map(|(_, c)| c)
    }

    /// Index into [`Record::cells`] and column entry for the named metric.
    pub fn metric(&self, name: &str) -> Option<(usize, &Column)> {
        self.metric_columns().enumerate().find(|(_, c)| c.name == name)
    }

    /// Index into [`Record::cells`] for the named metric.
    pub fn metric_index(&self, name: &str) -> Option<usize> {
        self.metric(name).map(|(i, _)| i)
    }
}

// ── Record / Dataset ──────────────────────────────────────────────────────────

/// One dated row of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    /// One cell per metric column, in [`Schema::metric_columns`] order.
    pub cells: Vec<Cell>,
}

/// The loaded dataset, ordered by date ascending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub schema: Schema,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names in their original order.
    pub fn columns(&self) -> Vec<String> {
        self.schema.names()
    }

    /// Names of the metric columns holding only numbers or missing cells.
    pub fn numeric_metrics(&self) -> Vec<String> {
        self.schema
            .metric_columns()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Earliest and latest date present, or `None` when empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// A dataset with the same schema holding `records`.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            schema: self.schema.clone(),
            records,
        }
    }

    /// Render back into a [`RawTable`] with `YYYY-MM-DD` dates.
    pub fn to_table(&self) -> RawTable {
        let date_index = self.schema.date_index;
        let rows = self
            .records
            .iter()
            .map(|record| {
                let mut row: Vec<String> = record.cells.iter().map(Cell::to_raw).collect();
                row.insert(date_index, format_date(record.date));
                row
            })
            .collect();
        RawTable {
            columns: self.schema.names(),
            rows,
        }
    }
}

// ── MonthKey ──────────────────────────────────────────────────────────────────

/// A calendar month used as a grouping key. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Truncate a date to its month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Summary types ─────────────────────────────────────────────────────────────

/// Mean and sample standard deviation over a set of observations.
///
/// Both statistics are `NaN` when undefined (see [`crate::statistics`]).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryStats {
    /// Number of valid numeric observations.
    pub count: usize,
    #[serde(rename = "average")]
    pub mean: f64,
    pub std_dev: f64,
}

/// Statistics for one month bucket.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryRecord {
    pub month: MonthKey,
    #[serde(flatten)]
    pub stats: SummaryStats,
}

impl SummaryRecord {
    pub fn mean(&self) -> f64 {
        self.stats.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.stats.std_dev
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
