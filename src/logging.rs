//! Logging setup
//!
//! Initializes the tracing subscriber for binaries embedding the pipeline.
//! Filtering follows `RUST_LOG` when set and defaults to `info`.

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize console logging
///
/// Safe to call once per process; returns an error if a subscriber is
/// already installed.
pub fn init_logging() -> Result<()> {
    fmt()
        .with_env_filter(env_filter())
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}

/// Initialize logging to a daily-rotated file in `dir`
///
/// Keep the returned guard alive for the lifetime of the process - dropping
/// it flushes and stops the background writer.
pub fn init_file_logging(dir: &str) -> Result<WorkerGuard> {
    let appender = tracing_appender::rolling::daily(dir, "forum-pipeline.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}
