//! Tracing setup.
//!
//! One-shot commands log to stderr. The interactive table owns the terminal,
//! so it logs to `{data_dir}/artpicker.log` instead.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "artpicker.log";

fn env_filter(debug: bool) -> EnvFilter {
    let default = if debug { "artpicker=debug" } else { "artpicker=info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

pub fn init_stderr(debug: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize tracing: {}", e))
}

/// Returns the guard that flushes the background writer on drop
pub fn init_file(dir: &Path, debug: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested");

        let guard = init_file(&log_dir, true).unwrap();
        tracing::info!("written to file");
        drop(guard);

        assert!(log_dir.join(LOG_FILE_NAME).exists());
    }
}
