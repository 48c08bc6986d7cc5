//! Record store: turns a [`RawTable`] into a typed, date-ordered [`Dataset`].

use std::path::Path;

use monitor_core::error::{MonitorError, Result};
use monitor_core::models::{Cell, Column, ColumnKind, Dataset, RawTable, Record, Schema};
use monitor_core::time_utils::parse_date;
use tracing::debug;

use crate::reader;

/// Parse the `Date` column, type every other cell, infer column kinds and
/// sort rows by date.
///
/// The sort is stable, so rows sharing a date keep their file order. Any
/// unparseable date aborts with [`MonitorError::InvalidDate`] naming the
/// 1-based data row.
pub fn normalize(table: RawTable) -> Result<Dataset> {
    let date_index = table.date_index().ok_or(MonitorError::MissingDateColumn)?;
    let width = table.columns.len();

    let mut records: Vec<Record> = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.into_iter().enumerate() {
        if row.len() != width {
            return Err(MonitorError::RaggedRow {
                row: idx + 1,
                found: row.len(),
                expected: width,
            });
        }

        let raw_date = &row[date_index];
        let date = parse_date(raw_date).ok_or_else(|| MonitorError::InvalidDate {
            value: raw_date.clone(),
            row: Some(idx + 1),
        })?;

        let cells = row
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_index)
            .map(|(_, raw)| Cell::parse(raw))
            .collect();

        records.push(Record { date, cells });
    }

    records.sort_by_key(|r| r.date);

    let schema = infer_schema(table.columns, date_index, &records);
    debug!(
        "Normalized {} records, {} metric columns",
        records.len(),
        schema.columns.len() - 1
    );

    Ok(Dataset { schema, records })
}

/// Load `path` and normalise it in one step.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    normalize(reader::load(path)?)
}

/// Column names in their original order, `Date` included.
pub fn columns(dataset: &Dataset) -> Vec<String> {
    dataset.columns()
}

/// A column is numeric unless some cell holds free text.
fn infer_schema(names: Vec<String>, date_index: usize, records: &[Record]) -> Schema {
    let mut metric_pos = 0;
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let kind = if i == date_index {
                ColumnKind::Date
            } else {
                let pos = metric_pos;
                metric_pos += 1;
                let has_text = records
                    .iter()
                    .any(|r| matches!(r.cells[pos], Cell::Text(_)));
                if has_text {
                    ColumnKind::Text
                } else {
                    ColumnKind::Numeric
                }
            };
            Column { name, kind }
        })
        .collect();

    Schema {
        columns,
        date_index,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
