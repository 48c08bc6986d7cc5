use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name to a `tracing` filter directive.
///
/// Unknown names pass through unchanged so that full directives such as
/// `"monitor_data=debug"` still work.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Build the [`EnvFilter`] for `log_level`, falling back to `"warn"` when the
/// directive does not parse.
pub fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialise the global `tracing` subscriber.
///
/// Events go to stderr so that report output on stdout stays clean. When
/// `log_file` is given, events are also appended there without ANSI colours.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(Mutex::new(open_log_file(path)?))
                .with_ansi(false),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Open `path` for appending, creating it and any missing parent directories.
fn open_log_file(path: &Path) -> anyhow::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
