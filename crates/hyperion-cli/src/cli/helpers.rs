use anyhow::Context;
use hyperion_core::RunReport;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins when set; otherwise each `-v` raises the level from `warn`.
pub(super) fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignored when a subscriber is already installed (repeated `run` calls in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(super) fn write_report(path: &Path, report: &RunReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory '{}'", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(report).context("failed to serialize run report")?;
    fs::write(path, content)
        .with_context(|| format!("failed to write run report '{}'", path.display()))
}
