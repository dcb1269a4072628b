//! Tracing setup for notemark binaries.
//!
//! # Usage
//!
//! ```ignore
//! use notemark_common::telemetry::{self, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env("notemark").verbose(true);
//!     telemetry::init(config);
//!
//!     tracing::info!("started");
//! }
//! ```

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name, logged once at startup
    pub service_name: String,
    /// Console log level (default: INFO, DEBUG in debug builds)
    pub console_level: Level,
}

impl TelemetryConfig {
    /// Load config from environment variables.
    ///
    /// - `RUST_LOG`: Standard env filter (optional, overrides console_level)
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        Self {
            service_name: service_name.into(),
            console_level,
        }
    }

    /// Raise the console level to TRACE.
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.console_level = Level::TRACE;
        }
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.console_level.as_str().to_lowercase()))
    }
}

/// Initialize tracing with a compact console layer on stderr.
///
/// Call once at application startup. A second call leaves the first
/// subscriber in place.
pub fn init(config: TelemetryConfig) {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_filter(config.env_filter());

    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!(
            service = %config.service_name,
            level = %config.console_level,
            "telemetry initialized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_raises_level() {
        let config = TelemetryConfig::from_env("test").verbose(true);
        assert_eq!(config.console_level, Level::TRACE);
        let config = TelemetryConfig::from_env("test").verbose(false);
        assert_ne!(config.console_level, Level::TRACE);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(TelemetryConfig::from_env("test"));
        init(TelemetryConfig::from_env("test"));
    }
}
