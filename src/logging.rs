//! Logging bootstrap for embedding applications

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;

/// Initialize logging to a file in the given directory.
///
/// Returns the writer guard; it must be kept alive for the duration of the
/// program or buffered log lines are lost.
pub fn init_file_logging(directory: &str, file_name: &str) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))?;
    Ok(guard)
}
