//! Configuration schema for the pacing engine.
//!
//! All sections deserialize with defaults and validate at client
//! construction, so a config file can specify only the values it changes.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Top-level configuration accepted at client construction
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PacerConfig {
    /// Per-minute quota limits
    #[validate(nested)]
    pub quotas: QuotaConfig,

    /// Retry and backoff behavior
    #[validate(nested)]
    pub retry: RetryConfig,

    /// Token estimation heuristics
    #[validate(nested)]
    pub estimator: EstimatorConfig,
}

impl PacerConfig {
    /// Create a configuration with default limits
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quota limits
    #[must_use]
    pub fn with_quotas(mut self, quotas: QuotaConfig) -> Self {
        self.quotas = quotas;
        self
    }

    /// Set the retry behavior
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the estimation heuristics
    #[must_use]
    pub fn with_estimator(mut self, estimator: EstimatorConfig) -> Self {
        self.estimator = estimator;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns validation errors if any section holds an out-of-range value
    pub fn validate_config(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

/// Per-minute quota limits for the three resource dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QuotaConfig {
    /// Requests per minute
    #[validate(range(min = 1))]
    pub requests_per_minute: u32,

    /// Prompt tokens per minute
    #[validate(range(min = 1))]
    pub input_tokens_per_minute: u32,

    /// Completion tokens per minute
    #[validate(range(min = 1))]
    pub output_tokens_per_minute: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 15,
            input_tokens_per_minute: 1_000_000,
            output_tokens_per_minute: 32_000,
        }
    }
}

/// Retry and backoff configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum retries after the initial attempt
    #[validate(range(min = 0, max = 10))]
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each subsequent one
    #[serde(with = "humantime_serde")]
    pub base_backoff: Duration,

    /// Upper bound on any single backoff delay
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,

    /// Jitter factor (0.0 - 1.0) shaving up to this fraction off each delay
    #[validate(range(min = 0.0, max = 1.0))]
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            jitter: 0.0,
        }
    }
}

/// Token estimation configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Estimated tokens per whitespace-separated word
    #[validate(range(min = 1))]
    pub tokens_per_word: u32,

    /// Estimated completion tokens per prompt token
    #[validate(range(min = 1))]
    pub output_input_ratio: u32,

    /// Cap on the completion estimate
    #[validate(range(min = 1))]
    pub max_output_estimate: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            tokens_per_word: 2,
            output_input_ratio: 2,
            max_output_estimate: 2048,
        }
    }
}
