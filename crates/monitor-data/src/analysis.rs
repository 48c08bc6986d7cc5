//! Main analysis pipeline for the fund monitor.
//!
//! Owns the loaded [`Dataset`] and runs filter → monthly summary queries
//! against it, returning an [`AnalysisResult`] ready for the report layer.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use monitor_core::error::{MonitorError, Result};
use monitor_core::models::{Dataset, SummaryRecord, SummaryStats};
use tracing::info;

use crate::aggregator::MonthlyAggregator;
use crate::filter::{filter_range, DateRange};
use crate::store;

// ── Public types ──────────────────────────────────────────────────────────────

/// The parameters of one summary query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub range: DateRange,
    /// Exact, case-sensitive column name.
    pub metric: String,
}

impl Query {
    /// Build a query from `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str, metric: impl Into<String>) -> Result<Self> {
        Ok(Self {
            range: DateRange::parse(start, end)?,
            metric: metric.into(),
        })
    }

    /// A query spanning the dataset's own first and last dates.
    pub fn full_range(dataset: &Dataset, metric: impl Into<String>) -> Result<Self> {
        let (start, end) = dataset
            .date_range()
            .ok_or_else(|| MonitorError::Config("dataset has no rows".to_string()))?;
        Ok(Self {
            range: DateRange::new(start, end)?,
            metric: metric.into(),
        })
    }
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// File the dataset was read from.
    pub data_path: PathBuf,
    /// Rows in the loaded dataset.
    pub rows_loaded: usize,
    /// Rows inside the query window.
    pub rows_matched: usize,
    /// Number of month buckets produced.
    pub months: usize,
    /// Wall-clock seconds spent loading and normalising the file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent filtering and aggregating.
    pub transform_time_seconds: f64,
}

/// The complete output of one query.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub metric: String,
    /// One record per month, chronological.
    pub summaries: Vec<SummaryRecord>,
    /// Statistics across the whole window.
    pub overall: SummaryStats,
    pub metadata: AnalysisMetadata,
}

// ── Monitor ───────────────────────────────────────────────────────────────────

/// A loaded dataset plus the queries that can be run against it.
///
/// The dataset is read-only once opened; a failed query leaves it intact
/// for another attempt with corrected parameters.
#[derive(Debug, Clone)]
pub struct Monitor {
    data_path: PathBuf,
    dataset: Dataset,
    load_time_seconds: f64,
}

impl Monitor {
    /// Load and normalise the file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let t0 = Instant::now();
        let dataset = store::load_dataset(path)?;
        let load_time_seconds = t0.elapsed().as_secs_f64();

        info!(
            "Loaded {} rows from {} in {:.3}s",
            dataset.len(),
            path.display(),
            load_time_seconds
        );

        Ok(Self {
            data_path: path.to_path_buf(),
            dataset,
            load_time_seconds,
        })
    }

    /// Wrap an already-normalised dataset.
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            data_path: PathBuf::new(),
            dataset,
            load_time_seconds: 0.0,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Column names in their original order.
    pub fn columns(&self) -> Vec<String> {
        store::columns(&self.dataset)
    }

    /// Filter to `query.range` and summarise `query.metric` per month.
    pub fn run(&self, query: &Query) -> Result<AnalysisResult> {
        let t0 = Instant::now();

        let filtered = filter_range(&self.dataset, query.range);
        let summaries = MonthlyAggregator::summarize(&filtered, &query.metric)?;
        let overall = MonthlyAggregator::summarize_overall(&filtered, &query.metric)?;

        let transform_time_seconds = t0.elapsed().as_secs_f64();

        info!(
            "Summarised {:?} from {} to {}: {} rows in {} months",
            query.metric,
            query.range.start(),
            query.range.end(),
            filtered.len(),
            summaries.len()
        );

        let metadata = AnalysisMetadata {
            generated_at: Utc::now().to_rfc3339(),
            data_path: self.data_path.clone(),
            rows_loaded: self.dataset.len(),
            rows_matched: filtered.len(),
            months: summaries.len(),
            load_time_seconds: self.load_time_seconds,
            transform_time_seconds,
        };

        Ok(AnalysisResult {
            metric: query.metric.clone(),
            summaries,
            overall,
            metadata,
        })
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline in one call.
///
/// 1. Load and normalise `path`.
/// 2. Keep rows dated within `[start, end]`.
/// 3. Summarise `metric` per calendar month.
pub fn analyze(path: &Path, start: &str, end: &str, metric: &str) -> Result<AnalysisResult> {
    let query = Query::parse(start, end, metric)?;
    Monitor::open(path)?.run(&query)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
