//! Logging setup
//!
//! Console output goes to stderr so command output on stdout stays
//! copy-ready. An optional directory adds a daily rotating file.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Filter used when `RUST_LOG` is not set (e.g., "warn", "stock_client=debug")
/// * `json_format` - JSON console output instead of human-readable lines
/// * `log_dir` - Optional directory for daily rotating `stockctl.log` files
///
/// The returned guard flushes the file writer and must be held until exit.
pub fn init_logger(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_timer(LocalTimer)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = rolling::daily(dir, "stockctl.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_timer(LocalTimer)
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    if let Some(dir) = log_dir {
        tracing::debug!(path = %dir.display(), "File logging enabled");
    }

    Ok(guard)
}
