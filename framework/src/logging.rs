//! Structured logging via `tracing`
//!
//! `RUST_LOG` takes precedence when set; otherwise `LOG_LEVEL` (default
//! `info`) applies to every target.

use crate::config::{env, AppConfig};
use tracing_subscriber::EnvFilter;

/// Log output configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::with_default_level("info")
    }

    /// Like `from_env`, but an unset `LOG_LEVEL` follows `APP_DEBUG`
    pub fn for_app(app: &AppConfig) -> Self {
        Self::with_default_level(app.default_log_level())
    }

    fn with_default_level(level: &str) -> Self {
        Self {
            level: env("LOG_LEVEL", level.to_string()),
            json: env("LOG_JSON", false),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Install the global subscriber
///
/// Only the first call installs anything; later calls (e.g. from several
/// tests in one binary) are no-ops.
pub fn init(config: &LogConfig) {
    let builder = tracing_subscriber::fmt().with_env_filter(config.filter());
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_ok() {
        tracing::debug!(level = %config.level, "logging initialised");
    }
}
