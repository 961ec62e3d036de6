//! Process-lifetime usage accounting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Monotonic usage counters for one remote model.
///
/// Counters only ever increase. Increments are atomic, so the ledger stays
/// correct if concurrent callers are introduced.
#[derive(Debug)]
pub struct UsageLedger {
    model: String,
    requests: AtomicU64,
    input_tokens: AtomicU64,
    output_tokens: AtomicU64,
    errors: AtomicU64,
    retries: AtomicU64,
}

impl UsageLedger {
    /// Create an empty ledger for `model`
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            requests: AtomicU64::new(0),
            input_tokens: AtomicU64::new(0),
            output_tokens: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            retries: AtomicU64::new(0),
        }
    }

    /// Record one successful call and its token usage
    pub fn record_success(&self, input_tokens: u64, output_tokens: u64) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.input_tokens.fetch_add(input_tokens, Ordering::Relaxed);
        self.output_tokens.fetch_add(output_tokens, Ordering::Relaxed);
        debug!(
            model = %self.model,
            input_tokens,
            output_tokens,
            "usage recorded"
        );
    }

    /// Record one terminal failure.
    ///
    /// Mid-retry failures are not counted here; only the terminal outcome of
    /// a call is an error.
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the retries one call performed beyond its initial attempt
    pub fn record_retries(&self, retries: u64) {
        if retries > 0 {
            self.retries.fetch_add(retries, Ordering::Relaxed);
        }
    }

    /// Model these counters apply to
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Take an immutable copy of the current counters
    #[must_use]
    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            model: self.model.clone(),
            total_requests: self.requests.load(Ordering::Relaxed),
            total_input_tokens: self.input_tokens.load(Ordering::Relaxed),
            total_output_tokens: self.output_tokens.load(Ordering::Relaxed),
            total_errors: self.errors.load(Ordering::Relaxed),
            total_retries: self.retries.load(Ordering::Relaxed),
            captured_at: Utc::now(),
        }
    }
}

/// Point-in-time copy of the ledger counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Model the counters apply to
    pub model: String,
    /// Successfully completed calls
    pub total_requests: u64,
    /// Prompt tokens consumed by successful calls
    pub total_input_tokens: u64,
    /// Completion tokens reported by successful calls
    pub total_output_tokens: u64,
    /// Terminally failed calls
    pub total_errors: u64,
    /// Retry attempts across all calls
    pub total_retries: u64,
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
}

impl UsageSnapshot {
    /// Total tokens across both directions
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.total_input_tokens + self.total_output_tokens
    }
}
