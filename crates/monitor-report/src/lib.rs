//! Report rendering for the fund monitor.
//!
//! Turns an [`AnalysisResult`] into text, JSON or CSV. No statistics are
//! computed here.

pub mod export;
pub mod table_view;

use monitor_core::error::Result;
use monitor_core::settings::OutputFormat;
use monitor_data::analysis::AnalysisResult;

/// How to render a result.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub format: OutputFormat,
    pub decimals: u32,
    /// Append the whole-window row (table format only).
    pub show_totals: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            decimals: 2,
            show_totals: true,
        }
    }
}

/// Render `result` in the requested format.
pub fn render(result: &AnalysisResult, options: &ReportOptions) -> Result<String> {
    match options.format {
        OutputFormat::Table => Ok(table_view::render_table_view(
            &result.metric,
            &result.summaries,
            options.show_totals.then_some(&result.overall),
            options.decimals,
        )),
        OutputFormat::Json => export::render_json(&result.summaries),
        OutputFormat::Csv => export::render_csv(&result.metric, &result.summaries, options.decimals),
    }
}

/// One column name per line, in dataset order, for `--list-columns`.
pub fn render_columns(columns: &[String]) -> String {
    let mut out = String::new();
    for name in columns {
        out.push_str(name);
        out.push('\n');
    }
    out
}
