//! Logging Initialization
//!
//! Sets up the tracing subscriber with env-filter support and an optional
//! non-blocking file layer. `log` macro calls from core modules are bridged
//! into the same subscriber.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "copymill=info";

/// Initialize console logging, honoring `RUST_LOG`.
///
/// Safe to call once per process; returns an error string if a global
/// subscriber is already installed.
pub fn init() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {e}"))?;

    Ok(())
}

/// Initialize console plus JSON file logging.
///
/// The returned guard must be held for the lifetime of the process; dropping
/// it stops the background writer and loses buffered lines.
pub fn init_with_file(log_dir: &Path) -> Result<WorkerGuard, String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_appender = tracing_appender::rolling::daily(log_dir, "copymill.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_filter(EnvFilter::new(DEFAULT_FILTER)),
        )
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {e}"))?;

    Ok(guard)
}
