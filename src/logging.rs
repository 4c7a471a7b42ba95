use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize logging. Console output goes to stderr so that stdout only
/// carries lookup results. `RUST_LOG` takes precedence over `log_level`.
///
/// The returned guard flushes the log file on drop and must be held for the
/// life of the program.
pub fn init_logging(log_level: &str, log_file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let console_layer = fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(log_file_path) = log_file {
        let path = Path::new(log_file_path);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", log_file_path))?;

        let log_appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking_appender, guard) = tracing_appender::non_blocking(log_appender);

        let file_layer = fmt::layer()
            .with_timer(UtcTime::rfc_3339())
            .with_target(true)
            .with_ansi(false)
            .with_writer(non_blocking_appender);

        registry
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;

        Ok(Some(guard))
    } else {
        registry
            .with(console_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;

        Ok(None)
    }
}
