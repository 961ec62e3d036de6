//! Structured logging initialization.
//!
//! Thin configuration layer over `tracing-subscriber`: JSON for machines,
//! pretty or compact for terminals, level taken from `RUST_LOG` when set.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable logging
    pub enabled: bool,
    /// Default level when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include timestamps (pretty and compact formats)
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Pretty,
            timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default log level
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Switch to JSON output
    #[must_use]
    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    /// Switch to compact output
    #[must_use]
    pub fn compact(mut self) -> Self {
        self.format = LogFormat::Compact;
        self
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured)
    Json,
    /// Pretty format (human-readable)
    #[default]
    Pretty,
    /// Compact format
    Compact,
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to install the global subscriber
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Initialize the global tracing subscriber with the given configuration
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    if !config.enabled {
        return Ok(());
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => init_json(filter),
        LogFormat::Pretty => init_pretty(config, filter),
        LogFormat::Compact => init_compact(config, filter),
    }
}

fn init_json(filter: EnvFilter) -> Result<(), LoggingError> {
    let layer = fmt::layer().json().with_target(true);
    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

fn init_pretty(config: &LoggingConfig, filter: EnvFilter) -> Result<(), LoggingError> {
    let layer = fmt::layer().pretty().with_target(true);
    let layer = if config.timestamps {
        layer.boxed()
    } else {
        layer.without_time().boxed()
    };
    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

fn init_compact(config: &LoggingConfig, filter: EnvFilter) -> Result<(), LoggingError> {
    let layer = fmt::layer().compact().with_target(true);
    let layer = if config.timestamps {
        layer.boxed()
    } else {
        layer.without_time().boxed()
    };
    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = LoggingConfig::new().with_level("debug").json();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.enabled);
    }

    #[test]
    fn test_format_serde_names() {
        assert_eq!(
            serde_json::to_string(&LogFormat::Json).expect("serialize"),
            "\"json\""
        );
        let format: LogFormat = serde_json::from_str("\"compact\"").expect("deserialize");
        assert_eq!(format, LogFormat::Compact);
    }

    #[test]
    fn test_disabled_init_is_a_no_op() {
        let config = LoggingConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_logging(&config).is_ok());
    }
}
