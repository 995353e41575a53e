//! # Logging & Tracing Bootstrap
//!
//! Configures the `tracing-subscriber` infrastructure for hosts that want the
//! core's structured logs on a console or captured by a test harness.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! init_logging(LoggingConfig::default().with_format(LogFormat::Compact))
//!     .expect("failed to initialize logging");
//!
//! tracing::info!("player core started");
//! ```
//!
//! The filter honors `RUST_LOG` when set, falling back to the configured
//! default level. Initialization is idempotent from the caller's point of
//! view: a second call reports `Error::Config` instead of panicking, which
//! matters for test binaries that initialize per-test.

use crate::error::{Error, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-oriented output.
    Pretty,
    /// Single-line output suitable for piping.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default directive applied when `RUST_LOG` is unset.
    pub default_directive: String,
    pub format: LogFormat,
    /// Include span targets in output.
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
            format: LogFormat::Compact,
            with_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_default_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns `Error::Config` if a global subscriber is already installed or the
/// filter directive cannot be parsed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_directive))
        .map_err(|e| Error::Config(format!("invalid log directive: {}", e)))?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| Error::Config(format!("failed to install subscriber: {}", e)))
}
