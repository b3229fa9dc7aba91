//! Tracing subscriber setup.
//!
//! Events go to stderr so `review-desk review` can keep stdout for JSON.
//! `RUST_LOG` overrides the configured level when set.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

const LOG_FILE_NAME: &str = "review-desk.log";

/// Filter directive used when `RUST_LOG` is unset.
pub fn filter_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.level.clone()
    }
}

/// Install the global subscriber. Hold the returned guard until exit so the
/// file writer flushes.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directive(config, verbose))
            .with_context(|| format!("Invalid log level '{}'", config.level))?,
    };

    let stderr_layer = if config.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
