mod bootstrap;
mod prompt;

use std::io::{self, Write};

use anyhow::Result;
use monitor_core::settings::Settings;
use monitor_data::analysis::Monitor;
use monitor_report::ReportOptions;

use crate::prompt::Prompter;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Fund Monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Settings: {:?}", settings);

    let monitor = Monitor::open(&settings.data_path)?;

    let mut out = io::stdout();

    if settings.list_columns {
        out.write_all(monitor_report::render_columns(&monitor.columns()).as_bytes())?;
        return Ok(());
    }

    let query = if settings.no_input {
        prompt::resolve_query::<io::StdinLock<'_>, io::Stdout>(&settings, monitor.dataset(), None)?
    } else {
        let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
        prompt::resolve_query(&settings, monitor.dataset(), Some(&mut prompter))?
    };

    let result = monitor.run(&query)?;
    let options = ReportOptions {
        format: settings.format,
        decimals: settings.decimals,
        show_totals: !settings.no_totals,
    };

    out.write_all(monitor_report::render(&result, &options)?.as_bytes())?;
    out.flush()?;

    tracing::debug!(
        "Load {:.3}s, transform {:.3}s",
        result.metadata.load_time_seconds,
        result.metadata.transform_time_seconds
    );
    Ok(())
}
