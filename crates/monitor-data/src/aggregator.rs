//! Monthly mean / standard-deviation aggregation of a metric column.

use std::collections::BTreeMap;

use monitor_core::error::{MonitorError, Result};
use monitor_core::models::{
    ColumnKind, Dataset, MonthKey, SummaryRecord, SummaryStats, DATE_COLUMN,
};
use monitor_core::statistics::RunningStats;
use tracing::{debug, warn};

/// Stateless helper that groups dataset rows by calendar month.
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    /// Summarise `metric` per calendar month, in chronological order.
    ///
    /// Every month with at least one row produces a record. Text and missing
    /// cells are left out of both statistics, so a month with no numeric
    /// values reports `NaN` for each.
    pub fn summarize(dataset: &Dataset, metric: &str) -> Result<Vec<SummaryRecord>> {
        let index = Self::metric_index(dataset, metric)?;
        if dataset.schema.metric(metric).map(|(_, c)| c.kind) == Some(ColumnKind::Text) {
            warn!("Column {:?} holds text; only its numeric cells are summarised", metric);
        }

        // BTreeMap keeps months in chronological order.
        let mut buckets: BTreeMap<MonthKey, RunningStats> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in &dataset.records {
            let stats = buckets.entry(MonthKey::from_date(record.date)).or_default();
            match record.cells[index].as_f64() {
                Some(value) => stats.push(value),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!("{} rows have no numeric {:?} value", skipped, metric);
        }

        debug!(
            "Summarised {:?} over {} rows into {} months ({} non-numeric skipped)",
            metric,
            dataset.len(),
            buckets.len(),
            skipped
        );

        Ok(buckets
            .into_iter()
            .map(|(month, stats)| SummaryRecord {
                month,
                stats: stats.summary(),
            })
            .collect())
    }

    /// Mean and standard deviation of `metric` over the whole dataset.
    pub fn summarize_overall(dataset: &Dataset, metric: &str) -> Result<SummaryStats> {
        let index = Self::metric_index(dataset, metric)?;
        let stats: RunningStats = dataset
            .records
            .iter()
            .filter_map(|r| r.cells[index].as_f64())
            .collect();
        Ok(stats.summary())
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// `Date` itself is not a metric.
    fn metric_index(dataset: &Dataset, metric: &str) -> Result<usize> {
        if metric == DATE_COLUMN {
            return Err(MonitorError::DateNotMetric(metric.to_string()));
        }
        dataset
            .schema
            .metric_index(metric)
            .ok_or_else(|| MonitorError::UnknownMetric(metric.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use monitor_core::models::{Cell, Column, ColumnKind, Record, Schema};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_dataset(rows: Vec<(NaiveDate, Cell)>) -> Dataset {
        Dataset {
            schema: Schema {
                columns: vec![
                    Column {
                        name: "Date".to_string(),
                        kind: ColumnKind::Date,
                    },
                    Column {
                        name: "Net Asset Value".to_string(),
                        kind: ColumnKind::Numeric,
                    },
                ],
                date_index: 0,
            },
            records: rows
                .into_iter()
                .map(|(date, cell)| Record {
                    date,
                    cells: vec![cell],
                })
                .collect(),
        }
    }

    // ── summarize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_monthly_groups_by_month() {
        let ds = make_dataset(vec![
            (ymd(2023, 1, 5), Cell::Number(10.0)),
            (ymd(2023, 1, 20), Cell::Number(20.0)),
            (ymd(2023, 2, 10), Cell::Number(15.0)),
        ]);
        let summary = MonthlyAggregator::summarize(&ds, "Net Asset Value").unwrap();

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].month.to_string(), "2023-01");
        assert_eq!(summary[0].mean(), 15.0);
        assert!((summary[0].std_dev() - 7.0710678118654755).abs() < 1e-9);
        assert_eq!(summary[0].stats.count, 2);

        assert_eq!(summary[1].month.to_string(), "2023-02");
        assert_eq!(summary[1].mean(), 15.0);
        assert!(summary[1].std_dev().is_nan());
    }

    #[test]
    fn test_monthly_empty_dataset() {
        let ds = make_dataset(vec![]);
        let summary = MonthlyAggregator::summarize(&ds, "Net Asset Value").unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn test_monthly_sorted_chronologically_across_years() {
        let ds = make_dataset(vec![
            (ymd(2023, 12, 1), Cell::Number(1.0)),
            (ymd(2024, 1, 1), Cell::Number(2.0)),
            (ymd(2023, 2, 1), Cell::Number(3.0)),
        ]);
        let summary = MonthlyAggregator::summarize(&ds, "Net Asset Value").unwrap();

        let keys: Vec<String> = summary.iter().map(|s| s.month.to_string()).collect();
        assert_eq!(keys, vec!["2023-02", "2023-12", "2024-01"]);
    }

    #[test]
    fn test_monthly_identical_values_zero_spread() {
        let ds = make_dataset(vec![
            (ymd(2023, 3, 1), Cell::Number(12.25)),
            (ymd(2023, 3, 2), Cell::Number(12.25)),
            (ymd(2023, 3, 3), Cell::Number(12.25)),
        ]);
        let summary = MonthlyAggregator::summarize(&ds, "Net Asset Value").unwrap();
        assert_eq!(summary[0].std_dev(), 0.0);
    }

    #[test]
    fn test_monthly_skips_non_numeric_cells() {
        let ds = make_dataset(vec![
            (ymd(2023, 1, 1), Cell::Number(10.0)),
            (ymd(2023, 1, 2), Cell::Missing),
            (ymd(2023, 1, 3), Cell::Text("suspended".to_string())),
            (ymd(2023, 1, 4), Cell::Number(20.0)),
        ]);
        let summary = MonthlyAggregator::summarize(&ds, "Net Asset Value").unwrap();

        assert_eq!(summary[0].stats.count, 2);
        assert_eq!(summary[0].mean(), 15.0);
    }

    #[test]
    fn test_monthly_bucket_without_numbers_is_undefined() {
        let ds = make_dataset(vec![
            (ymd(2023, 1, 1), Cell::Missing),
            (ymd(2023, 2, 1), Cell::Number(4.0)),
        ]);
        let summary = MonthlyAggregator::summarize(&ds, "Net Asset Value").unwrap();

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].stats.count, 0);
        assert!(summary[0].mean().is_nan());
        assert!(summary[0].std_dev().is_nan());
    }

    #[test]
    fn test_text_column_summarises_numeric_cells_only() {
        let mut ds = make_dataset(vec![
            (ymd(2023, 1, 1), Cell::Text("1,5".to_string())),
            (ymd(2023, 1, 2), Cell::Number(4.0)),
            (ymd(2023, 1, 3), Cell::Number(6.0)),
        ]);
        ds.schema.columns[1].kind = ColumnKind::Text;
        assert!(ds.numeric_metrics().is_empty());

        let summary = MonthlyAggregator::summarize(&ds, "Net Asset Value").unwrap();
        assert_eq!(summary[0].stats.count, 2);
        assert_eq!(summary[0].mean(), 5.0);
    }

    #[test]
    fn test_unknown_metric() {
        let ds = make_dataset(vec![(ymd(2023, 1, 1), Cell::Number(1.0))]);

        let err = MonthlyAggregator::summarize(&ds, "net asset value").unwrap_err();
        match err {
            MonitorError::UnknownMetric(name) => assert_eq!(name, "net asset value"),
            other => panic!("unexpected error: {other}"),
        }

        let err = MonthlyAggregator::summarize(&ds, "Date").unwrap_err();
        assert!(matches!(err, MonitorError::DateNotMetric(_)));
        assert_eq!(err.to_string(), "'Date' is the date column, not a metric");
    }

    #[test]
    fn test_unknown_metric_on_empty_dataset() {
        let ds = make_dataset(vec![]);
        assert!(MonthlyAggregator::summarize(&ds, "Return").is_err());
    }

    // ── summarize_overall ─────────────────────────────────────────────────────

    #[test]
    fn test_overall_spans_all_months() {
        let ds = make_dataset(vec![
            (ymd(2023, 1, 5), Cell::Number(10.0)),
            (ymd(2023, 1, 20), Cell::Number(20.0)),
            (ymd(2023, 2, 10), Cell::Number(15.0)),
        ]);
        let overall = MonthlyAggregator::summarize_overall(&ds, "Net Asset Value").unwrap();

        assert_eq!(overall.count, 3);
        assert_eq!(overall.mean, 15.0);
        assert!((overall.std_dev - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_overall_unknown_metric() {
        let ds = make_dataset(vec![]);
        assert!(MonthlyAggregator::summarize_overall(&ds, "Return").is_err());
    }
}
