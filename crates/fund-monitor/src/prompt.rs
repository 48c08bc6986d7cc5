//! Interactive collection of query parameters missing from the command line.

use std::io::{BufRead, Write};

use monitor_core::error::{MonitorError, Result};
use monitor_core::settings::Settings;
use monitor_data::analysis::Query;
use monitor_data::core::models::Dataset;

/// Line-oriented question/answer over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one trimmed answer.
    ///
    /// End of input or a blank answer is a configuration error naming `what`.
    pub fn ask(&mut self, question: &str, what: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        let answer = line.trim();
        if read == 0 || answer.is_empty() {
            return Err(MonitorError::Config(format!("no {} given", what)));
        }
        Ok(answer.to_string())
    }

    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}

/// Build the query from `settings`, asking for anything missing.
///
/// With `prompter` set to `None` (the `--no-input` mode) missing parameters
/// are a configuration error instead.
pub fn resolve_query<R: BufRead, W: Write>(
    settings: &Settings,
    dataset: &Dataset,
    mut prompter: Option<&mut Prompter<R, W>>,
) -> Result<Query> {
    let metrics = dataset.numeric_metrics();

    if !settings.has_complete_query() {
        if let Some(p) = prompter.as_deref_mut() {
            p.say(&format!("Available Metrics: {}", metrics.join(", ")))?;
        }
    }

    let (start, end) = if settings.full_range {
        (None, None)
    } else {
        let start = value_or_ask(
            settings.start.as_deref(),
            prompter.as_deref_mut(),
            "Enter start date (YYYY-MM-DD): ",
            "start date",
        )?;
        let end = value_or_ask(
            settings.end.as_deref(),
            prompter.as_deref_mut(),
            "Enter end date (YYYY-MM-DD): ",
            "end date",
        )?;
        (Some(start), Some(end))
    };

    let metric = value_or_ask(
        settings.metric.as_deref(),
        prompter.as_deref_mut(),
        &format!("Enter metric to monitor ({}): ", metrics.join(", ")),
        "metric",
    )?;

    match (start, end) {
        (Some(start), Some(end)) => Query::parse(&start, &end, metric),
        _ => Query::full_range(dataset, metric),
    }
}

fn value_or_ask<R: BufRead, W: Write>(
    given: Option<&str>,
    prompter: Option<&mut Prompter<R, W>>,
    question: &str,
    what: &str,
) -> Result<String> {
    match (given, prompter) {
        (Some(value), _) => Ok(value.to_string()),
        (None, Some(p)) => p.ask(question, what),
        (None, None) => Err(MonitorError::Config(format!(
            "missing {} (pass it as an option or drop --no-input)",
            what
        ))),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
