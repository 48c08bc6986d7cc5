//! File loading for the fund monitor.
//!
//! Reads delimited text (`.csv`, `.tsv`), JSON Lines (`.jsonl`) and
//! spreadsheet workbooks (`.xlsx`, `.xls`, `.ods`) into an untyped
//! [`RawTable`]. Typing and date parsing happen later in
//! [`crate::store::normalize`].

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::Timelike;
use monitor_core::error::{MonitorError, Result};
use monitor_core::models::RawTable;
use monitor_core::time_utils::format_date;
use serde_json::Value;
use tracing::debug;

// ── FileFormat ────────────────────────────────────────────────────────────────

/// Input layouts the reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    JsonLines,
    /// First worksheet of an Excel or OpenDocument workbook.
    Spreadsheet,
}

impl FileFormat {
    /// Pick a format from the file extension (case-insensitive).
    ///
    /// Anything else yields [`MonitorError::UnsupportedFormat`].
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "tsv" | "tab" => Ok(FileFormat::Tsv),
            "jsonl" | "ndjson" => Ok(FileFormat::JsonLines),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileFormat::Spreadsheet),
            _ => Err(MonitorError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read `path` into a [`RawTable`].
///
/// Fails with a load error when the file is missing or unreadable, has an
/// unsupported extension, has no header, contains rows whose width differs
/// from the header, or lacks a `Date` column.
pub fn load(path: &Path) -> Result<RawTable> {
    let format = FileFormat::detect(path)?;
    let file = std::fs::File::open(path).map_err(|source| MonitorError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let table = match format {
        FileFormat::Csv => read_delimited(path, file, b',')?,
        FileFormat::Tsv => read_delimited(path, file, b'\t')?,
        FileFormat::JsonLines => read_json_lines(path, file)?,
        FileFormat::Spreadsheet => read_spreadsheet(path)?,
    };

    if table.columns.is_empty() {
        return Err(MonitorError::EmptyInput(path.to_path_buf()));
    }
    check_unique_columns(path, &table.columns)?;
    if table.date_index().is_none() {
        return Err(MonitorError::MissingDateColumn);
    }

    debug!(
        "Loaded {} rows x {} columns from {}",
        table.rows.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn malformed(path: &Path, reason: impl Into<String>) -> MonitorError {
    MonitorError::Malformed {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn read_delimited(path: &Path, file: std::fs::File, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(file);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    // An empty file yields a single empty header field.
    if columns.iter().all(|c| c.is_empty()) {
        return Ok(RawTable::default());
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { columns, rows })
}

fn csv_error(path: &Path, err: csv::Error) -> MonitorError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => MonitorError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        _ => malformed(path, reason),
    }
}

fn read_json_lines(path: &Path, file: std::fs::File) -> Result<RawTable> {
    let reader = std::io::BufReader::new(file);
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line_result.map_err(|source| MonitorError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| malformed(path, format!("line {}: {}", line_no, e)))?;
        let Value::Object(object) = value else {
            return Err(malformed(
                path,
                format!("line {}: expected a JSON object", line_no),
            ));
        };

        // The first object fixes the column set and order.
        if columns.is_empty() {
            columns = object.keys().cloned().collect();
        } else if object.len() != columns.len()
            || !columns.iter().all(|c| object.contains_key(c))
        {
            return Err(malformed(
                path,
                format!("line {}: keys differ from the first record", line_no),
            ));
        }

        let row = columns
            .iter()
            .map(|c| json_cell(&object[c.as_str()]))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

fn json_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The first worksheet, first row as header. Fully blank rows are dropped.
fn read_spreadsheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| malformed(path, e.to_string()))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(sheet) => sheet.map_err(|e| malformed(path, e.to_string()))?,
        None => return Ok(RawTable::default()),
    };

    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        return Ok(RawTable::default());
    };
    let columns = header.iter().map(spreadsheet_cell).collect();
    let rows = sheet_rows
        .map(|row| row.iter().map(spreadsheet_cell).collect::<Vec<String>>())
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    Ok(RawTable { columns, rows })
}

/// Raw string form of a workbook cell. Error cells read as missing.
fn spreadsheet_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) if ts.num_seconds_from_midnight() == 0 => format_date(ts.date()),
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
    }
}

fn check_unique_columns(path: &Path, columns: &[String]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for name in columns {
        if !seen.insert(name.as_str()) {
            return Err(malformed(path, format!("duplicate column \"{}\"", name)));
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
