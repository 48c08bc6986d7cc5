//! Machine-readable renderings of the monthly summary.

use monitor_core::error::{MonitorError, Result};
use monitor_core::formatting::format_plain;
use monitor_core::models::SummaryRecord;

use crate::table_view::headers;

/// JSON array with one `{month, count, average, std_dev}` object per month.
///
/// Undefined statistics serialise as `null`.
pub fn render_json(rows: &[SummaryRecord]) -> Result<String> {
    let mut text = serde_json::to_string_pretty(rows).map_err(anyhow::Error::new)?;
    text.push('\n');
    Ok(text)
}

/// CSV with the table headers; undefined statistics are empty fields.
pub fn render_csv(metric: &str, rows: &[SummaryRecord], decimals: u32) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers(metric)).map_err(csv_err)?;
    for row in rows {
        writer
            .write_record([
                row.month.to_string(),
                format_plain(row.mean(), decimals),
                format_plain(row.std_dev(), decimals),
            ])
            .map_err(csv_err)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| MonitorError::Other(anyhow::Error::new(e)))
}

fn csv_err(err: csv::Error) -> MonitorError {
    MonitorError::Other(anyhow::Error::new(err))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::models::{MonthKey, SummaryStats};

    fn scenario() -> Vec<SummaryRecord> {
        vec![
            SummaryRecord {
                month: MonthKey::new(2023, 1),
                stats: SummaryStats {
                    count: 2,
                    mean: 15.0,
                    std_dev: 50.0_f64.sqrt(),
                },
            },
            SummaryRecord {
                month: MonthKey::new(2023, 2),
                stats: SummaryStats {
                    count: 1,
                    mean: 15.0,
                    std_dev: f64::NAN,
                },
            },
        ]
    }

    #[test]
    fn test_render_json() {
        let text = render_json(&scenario()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        let months = value.as_array().unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0]["month"], "2023-01");
        assert_eq!(months[0]["average"], 15.0);
        assert!((months[0]["std_dev"].as_f64().unwrap() - 7.0710678).abs() < 1e-6);
        assert_eq!(months[1]["count"], 1);
        assert!(months[1]["std_dev"].is_null());
    }

    #[test]
    fn test_render_json_empty() {
        assert_eq!(render_json(&[]).unwrap(), "[]\n");
    }

    #[test]
    fn test_render_csv() {
        let text = render_csv("Net Asset Value", &scenario(), 3).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Month,Average Net Asset Value,Standard Deviation Net Asset Value",
                "2023-01,15.000,7.071",
                "2023-02,15.000,",
            ]
        );
    }
}
