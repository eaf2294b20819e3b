//! Tracing setup for the binary.
//!
//! Logs go to stderr so streamed copy on stdout stays clean. `RUST_LOG`
//! overrides `log_level` from the config file.

use anyhow::Result;
use listcraft_core::config::ClientConfig;
use listcraft_infrastructure::ListcraftPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// The returned guard flushes the file log on drop and must outlive every
/// log call.
pub fn init(
    config: &ClientConfig,
    paths: &ListcraftPaths,
    quiet: bool,
) -> Result<Option<WorkerGuard>> {
    let directive = if quiet { "warn" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(directive))?;
    let stderr = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if !config.log_to_file {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return Ok(None);
    }

    let logs_dir = paths.logs_dir()?;
    std::fs::create_dir_all(&logs_dir)?;
    let appender = tracing_appender::rolling::daily(&logs_dir, "listcraft.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    tracing::debug!("Logging to {}", logs_dir.display());

    Ok(Some(guard))
}
