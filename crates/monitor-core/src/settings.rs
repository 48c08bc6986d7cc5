use clap::{Parser, ValueEnum};
use std::path::PathBuf;

// ── OutputFormat ──────────────────────────────────────────────────────────────

/// How the monthly summary is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned human-readable table
    #[default]
    Table,
    /// JSON array, one object per month
    Json,
    /// Comma-separated values with a header row
    Csv,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Monthly mean / standard-deviation summaries for periodic fund records
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fund-monitor",
    about = "Monthly mean / standard-deviation summaries for periodic fund records",
    version
)]
pub struct Settings {
    /// Dataset to analyse (.csv, .tsv or .jsonl)
    pub data_path: PathBuf,

    /// First day of the window, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Last day of the window, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Metric column to summarise (case-sensitive)
    #[arg(long)]
    pub metric: Option<String>,

    /// Use the dataset's own first and last dates as the window
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub full_range: bool,

    /// Print the dataset's columns and exit
    #[arg(long)]
    pub list_columns: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Decimal places for averages and deviations (0-10)
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u32).range(0..=10))]
    pub decimals: u32,

    /// Omit the whole-range summary row
    #[arg(long)]
    pub no_totals: bool,

    /// Never prompt; fail when a query parameter is missing
    #[arg(long)]
    pub no_input: bool,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`load`](Self::load) but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// Fallible variant of [`load_from_args`](Self::load_from_args).
    pub fn try_load_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    /// Apply the `--debug` flag and normalise free-form strings.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        for value in [&mut settings.start, &mut settings.end, &mut settings.metric] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *value = None;
            }
        }
        settings
    }

    /// `true` when every query parameter is already known.
    pub fn has_complete_query(&self) -> bool {
        self.metric.is_some() && (self.full_range || (self.start.is_some() && self.end.is_some()))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
