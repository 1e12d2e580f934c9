//! Log setup: stdout plus a plain-text `shiwake.log` in the sorted folder.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Name of the log file written into the source root.
pub const LOG_FILE_NAME: &str = "shiwake.log";

/// Handle kept alive for the run. Dropping it flushes the file log.
pub struct LogHandle {
    _guard: Option<WorkerGuard>,
    /// Path of the file log, if one could be opened.
    pub path: Option<PathBuf>,
}

fn open_log_file(root: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder().filename_prefix(LOG_FILE_NAME).build(root)
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// level. When the log file cannot be opened only stdout is used.
pub fn init(root: &Path) -> LogHandle {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard, path, open_error) = match open_log_file(root) {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(non_blocking).with_target(false).with_ansi(false);
            (Some(layer), Some(guard), Some(root.join(LOG_FILE_NAME)), None)
        }
        Err(err) => (None, None, None, Some(err)),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(file_layer)
        .with(filter)
        .init();

    if let Some(err) = open_error {
        tracing::warn!("cannot open {} in {}, logging to stdout only: {err}", LOG_FILE_NAME, root.display());
    }

    LogHandle { _guard: guard, path }
}
