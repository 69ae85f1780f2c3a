//! Shared tracing subscriber for the binaries: `EnvFilter`, stderr, optional daily log file.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the file writer flushing; drop it at process exit.
pub type TracingGuard = Option<WorkerGuard>;

#[derive(Debug, thiserror::Error)]
pub enum TracingInitError {
    #[error("create log dir {}: {source}", path.display())]
    LogDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("install subscriber: {0}")]
    Install(String),
}

#[derive(Clone, Debug)]
pub struct TracingOptions {
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
    /// Directory for daily-rolling files; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
    /// File name prefix inside `log_dir`.
    pub file_prefix: String,
}

impl TracingOptions {
    /// Defaults for `app_name`: filter `info`, file prefix `<app_name>.log`, log dir from
    /// `PARLEY_LOG_DIR` when set.
    pub fn from_env(app_name: &str) -> Self {
        Self {
            default_filter: "info".to_string(),
            log_dir: std::env::var_os("PARLEY_LOG_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            file_prefix: format!("{}.log", app_name),
        }
    }
}

fn filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Installs the global subscriber. Call once, early in `main`, and hold the guard.
pub fn init_tracing(options: &TracingOptions) -> Result<TracingGuard, TracingInitError> {
    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter(&options.default_filter));

    let (file, guard) = match &options.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| TracingInitError::LogDir {
                path: dir.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::daily(dir, &options.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter(&options.default_filter));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr)
        .with(file)
        .try_init()
        .map_err(|e| TracingInitError::Install(e.to_string()))?;
    Ok(guard)
}
