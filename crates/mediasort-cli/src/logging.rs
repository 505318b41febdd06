//! Tracing initialization and log-file pruning.
//! Console and file sinks share one filter; the file layer is non-blocking
//! and its guard must be held until process exit to flush.

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// Truncate the log file if it has grown past `max_size` bytes.
/// Runs before the subscriber is installed so the appender starts on a
/// fresh file.
pub fn prune_log(path: &Path, max_size: u64) -> Result<()> {
    if let Ok(meta) = fs::metadata(path) {
        if meta.len() > max_size {
            fs::File::create(path)
                .with_context(|| format!("truncating log file {}", path.display()))?;
            eprintln!(
                "Log file {} exceeded {} bytes, truncated",
                path.display(),
                max_size
            );
        }
    }
    Ok(())
}

/// Install a compact console layer plus a non-blocking file layer.
/// If the log file cannot be opened, logging continues on the console only.
pub fn init(log_path: &Path, level: &str) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .compact();
            registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .init();
            Ok(Some(guard))
        }
        Err(e) => {
            eprintln!(
                "Failed to open log file {}: {}; logging to console only",
                log_path.display(),
                e
            );
            registry().with(env_filter).with(console_layer).init();
            Ok(None)
        }
    }
}
