//! Plain-text monthly summary table.
//!
//! Renders one row per month with the month label left-aligned and both
//! statistics right-aligned, plus an optional `All` row for the whole window.

use unicode_width::UnicodeWidthStr;

use monitor_core::formatting;
use monitor_core::models::{SummaryRecord, SummaryStats};

/// Label of the whole-window row.
pub const TOTAL_LABEL: &str = "All";

/// Note printed under the header when the window holds no rows.
pub const EMPTY_NOTE: &str = "No data in range";

/// Gap between columns.
const COLUMN_GAP: &str = "  ";

/// Column headers for `metric`, in display order.
pub fn headers(metric: &str) -> [String; 3] {
    [
        "Month".to_string(),
        format!("Average {}", metric),
        format!("Standard Deviation {}", metric),
    ]
}

/// Render the summary table as a string ending in a newline.
///
/// `overall` adds a separated `All` row when present and the table is not
/// empty.
pub fn render_table_view(
    metric: &str,
    rows: &[SummaryRecord],
    overall: Option<&SummaryStats>,
    decimals: u32,
) -> String {
    let header = headers(metric);

    let body: Vec<[String; 3]> = rows
        .iter()
        .map(|r| stat_row(r.month.to_string(), &r.stats, decimals))
        .collect();
    let footer = overall
        .filter(|_| !rows.is_empty())
        .map(|stats| stat_row(TOTAL_LABEL.to_string(), stats, decimals));

    let mut widths = [0usize; 3];
    for row in std::iter::once(&header).chain(&body).chain(footer.iter()) {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.width());
        }
    }

    let rule: [String; 3] = widths.map(|w| "-".repeat(w));

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    push_line(&mut out, &rule, &widths);

    if body.is_empty() {
        out.push_str(EMPTY_NOTE);
        out.push('\n');
        return out;
    }

    for row in &body {
        push_line(&mut out, row, &widths);
    }
    if let Some(footer) = footer {
        push_line(&mut out, &rule, &widths);
        push_line(&mut out, &footer, &widths);
    }
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn stat_row(label: String, stats: &SummaryStats, decimals: u32) -> [String; 3] {
    [
        label,
        formatting::format_statistic(stats.mean, decimals),
        formatting::format_statistic(stats.std_dev, decimals),
    ]
}

/// First column left-aligned, the rest right-aligned, trailing spaces trimmed.
fn push_line(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.iter().zip(widths.iter()).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        let pad = " ".repeat(width.saturating_sub(cell.width()));
        if i == 0 {
            line.push_str(cell);
            line.push_str(&pad);
        } else {
            line.push_str(&pad);
            line.push_str(cell);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::models::MonthKey;

    fn record(year: i32, month: u32, count: usize, mean: f64, std_dev: f64) -> SummaryRecord {
        SummaryRecord {
            month: MonthKey::new(year, month),
            stats: SummaryStats {
                count,
                mean,
                std_dev,
            },
        }
    }

    fn scenario() -> Vec<SummaryRecord> {
        vec![
            record(2023, 1, 2, 15.0, 50.0_f64.sqrt()),
            record(2023, 2, 1, 15.0, f64::NAN),
        ]
    }

    #[test]
    fn test_headers_include_metric() {
        assert_eq!(
            headers("NAV"),
            [
                "Month".to_string(),
                "Average NAV".to_string(),
                "Standard Deviation NAV".to_string()
            ]
        );
    }

    #[test]
    fn test_render_rows_and_alignment() {
        let text = render_table_view("NAV", &scenario(), None, 2);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Month    Average NAV  Standard Deviation NAV");
        assert_eq!(lines[1], "-------  -----------  ----------------------");
        assert_eq!(lines[2], "2023-01        15.00                    7.07");
        assert_eq!(lines[3], "2023-02        15.00                     NaN");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_render_with_overall_row() {
        let overall = SummaryStats {
            count: 3,
            mean: 15.0,
            std_dev: 5.0,
        };
        let text = render_table_view("NAV", &scenario(), Some(&overall), 1);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[4].starts_with("-------"));
        assert_eq!(lines[5], "All             15.0                     5.0");
    }

    #[test]
    fn test_render_empty_table() {
        let overall = SummaryStats {
            count: 0,
            mean: f64::NAN,
            std_dev: f64::NAN,
        };
        let text = render_table_view("Return", &[], Some(&overall), 2);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], EMPTY_NOTE);
    }

    #[test]
    fn test_wide_values_expand_column() {
        let rows = vec![record(2023, 1, 2, 1_234_567.891, 0.5)];
        let text = render_table_view("X", &rows, None, 2);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Month       Average X  Standard Deviation X");
        assert_eq!(lines[2], "2023-01  1,234,567.89                  0.50");
    }
}
