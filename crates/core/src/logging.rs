//! Structured logging infrastructure for Errata.
//!
//! Log level can be configured via the `RUST_LOG` environment variable and
//! defaults to `info`. Secrets (passwords, keyring bytes) must never reach a
//! log line; only paths, names and outcomes are logged.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::LogConfig;

const DEFAULT_DIRECTIVE: &str = "info";

/// Output format of the global subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

impl LogFormat {
    pub fn from_config(config: &LogConfig) -> Self {
        if config.json {
            Self::Json
        } else {
            Self::Human
        }
    }
}

/// Filter from `RUST_LOG`-style directives, `info` when absent or invalid.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn default_filter() -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

/// Initialize the logging system with human-readable output.
///
/// # Example
/// ```no_run
/// use errata_core::logging;
///
/// logging::init();
/// tracing::info!("Service starting");
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}

/// Initialize the logging system with JSON output for log aggregation.
///
/// # Example
/// ```no_run
/// use errata_core::logging;
///
/// logging::init_json();
/// tracing::info!(service = "errata", "Service started");
/// ```
pub fn init_json() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt::layer().json().with_target(true).with_thread_ids(true))
        .init();
}

/// Pick the output format from configuration.
pub fn init_from_config(config: &LogConfig) {
    match LogFormat::from_config(config) {
        LogFormat::Json => init_json(),
        LogFormat::Human => init(),
    }
}
