//! Structured logging via `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: Storage writes that failed and were dropped
//! - `warn`: Malformed persisted payloads, simulated request failures
//! - `info`: Session bootstrap, store hydration
//! - `debug`: Store mutations, suggestion and chat resolution
//! - `trace`: Raw storage change events

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing_subscriber::{fmt as subscriber_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for log aggregation).
    Json,
    /// Compact single-line format.
    #[default]
    Compact,
    /// Human-readable multi-line format.
    Pretty,
}

/// Minimum level to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for logging behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level; `RUST_LOG` overrides it when set.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Whether to use ANSI colors.
    pub ansi: bool,
}

impl LogConfig {
    /// Create a `LogConfig` from a verbosity count (0 = info, 1 = debug, 2+ = trace).
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    pub fn default_directive(&self) -> String {
        self.level.as_str().to_string()
    }
}

/// Errors from logging setup.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` if a subscriber was already installed (by an earlier
/// call or by the host), which is not an error.
pub fn init_logging(config: &LogConfig) -> Result<bool, LoggingError> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(config.default_directive()),
    }
    .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry
            .with(subscriber_fmt::layer().json().with_ansi(false))
            .try_init(),
        LogFormat::Compact => registry
            .with(subscriber_fmt::layer().compact().with_ansi(config.ansi))
            .try_init(),
        LogFormat::Pretty => registry
            .with(subscriber_fmt::layer().pretty().with_ansi(config.ansi))
            .try_init(),
    };

    Ok(installed.is_ok())
}
