//! Per-run tracing setup
//!
//! The subscriber is installed as the default for the calling thread and
//! handed to worker threads explicitly through [`LogGuard::dispatch`]. It
//! lives exactly as long as the returned guard.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::dispatcher::DefaultGuard;
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

pub struct LogGuard {
    dispatch: Dispatch,
    _default: DefaultGuard,
    _writer: Option<WorkerGuard>,
}

impl LogGuard {
    /// Handle to install on threads spawned for this run
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

/// Filter directive for a verbosity count on top of the configured level
pub fn level_for(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.to_ascii_lowercase(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Build and install the subscriber for this run
///
/// `RUST_LOG` takes precedence over `-v` and the config file. With
/// `log_file` set, output goes to that file through a non-blocking writer
/// instead of stderr.
pub fn init(verbosity: u8, configured_level: &str, log_file: Option<&Path>) -> Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_for(verbosity, configured_level)))
        .context("Invalid log filter")?;

    let (writer, worker, ansi) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None, true),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish();

    let dispatch = Dispatch::new(subscriber);
    let default = tracing::dispatcher::set_default(&dispatch);

    Ok(LogGuard {
        dispatch,
        _default: default,
        _writer: worker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_config() {
        assert_eq!(level_for(0, "WARN"), "warn");
        assert_eq!(level_for(1, "warn"), "debug");
        assert_eq!(level_for(3, "warn"), "trace");
    }

    #[test]
    fn test_log_file_receives_events() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let log_path = temp_dir.path().join("jule.log");

        {
            let _guard = init(0, "info", Some(&log_path))?;
            tracing::info!(answer = 42, "hello from the test");
        }

        let contents = std::fs::read_to_string(&log_path)?;
        // RUST_LOG in the environment may silence info; only check when it is unset
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(contents.contains("hello from the test"));
            assert!(contents.contains("answer=42"));
        }
        Ok(())
    }
}
