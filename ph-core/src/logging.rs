//! Structured logging setup using the `tracing` ecosystem.
//!
//! The subscriber is built once at process start and handed back as a
//! [`Logger`] holding an explicit [`Dispatch`]. Nothing is installed as the
//! global default: callers attach the dispatch to the work they run, e.g.
//! with `tracing::instrument::WithSubscriber::with_subscriber`.

use std::path::Path;

use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::constants;
use crate::error::{PhError, PhResult};

/// Timestamp format of log lines.
const LOG_TIME_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";

/// A constructed log sink.
///
/// Keeps the non-blocking file writer alive; dropping it flushes and closes
/// the log file.
pub struct Logger {
    dispatch: Dispatch,
    _guard: Option<WorkerGuard>,
}

impl Logger {
    /// Build a logger writing to stderr and to `backup_upgrade.log` in `log_dir`.
    ///
    /// # Arguments
    /// * `level` - Filter directive: "trace", "debug", "info", "warn", "error"
    /// * `log_dir` - Directory for the log file, created if missing
    /// * `json_output` - If true, the file receives JSON lines
    pub fn init(level: &str, log_dir: &Path, json_output: bool) -> PhResult<Self> {
        std::fs::create_dir_all(log_dir).map_err(|e| {
            PhError::Logging(format!("cannot create log directory {}: {e}", log_dir.display()))
        })?;

        let file_appender = rolling::never(log_dir, constants::LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
            .compact();

        let dispatch = if json_output {
            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .json()
                .with_target(true)
                .with_current_span(true);

            Dispatch::new(
                tracing_subscriber::registry()
                    .with(env_filter(level))
                    .with(console_layer)
                    .with(file_layer),
            )
        } else {
            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()));

            Dispatch::new(
                tracing_subscriber::registry()
                    .with(env_filter(level))
                    .with(console_layer)
                    .with(file_layer),
            )
        };

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::info!("logging initialized at level={level}, dir={}", log_dir.display());
        });

        Ok(Self {
            dispatch,
            _guard: Some(guard),
        })
    }

    /// Build a minimal console-only logger for tests or simple CLI usage.
    pub fn console(level: &str) -> Self {
        let dispatch = Dispatch::new(
            tracing_subscriber::registry()
                .with(env_filter(level))
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true).compact()),
        );
        Self {
            dispatch,
            _guard: None,
        }
    }

    /// The dispatch to attach to work that should log through this logger.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_console_logger_does_not_panic() {
        let logger = Logger::console("debug");
        tracing::dispatcher::with_default(logger.dispatch(), || {
            tracing::debug!("console logger works");
        });
    }

    #[test]
    fn test_init_creates_log_directory() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");
        let logger = Logger::init("info", &log_dir, false).unwrap();
        assert!(log_dir.is_dir());
        drop(logger);
        assert!(log_dir.join(constants::LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_init_with_bad_level_falls_back() {
        let dir = TempDir::new().unwrap();
        assert!(Logger::init("not a level!!", dir.path(), true).is_ok());
    }

    #[test]
    fn test_init_on_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();
        let err = Logger::init("info", &file, false).err().unwrap();
        assert!(matches!(err, PhError::Logging(_)));
    }
}
