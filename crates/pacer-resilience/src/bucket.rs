//! Continuous-refill token buckets, one per quota dimension.
//!
//! Refill is continuous rather than tick-based, so wait times are exact to
//! floating-point precision and a full-capacity burst is available at start.
//! Capacity and rate derive directly from the per-minute quota: a bucket for
//! an RPM limit of 15 holds 15 tokens and refills at 0.25 tokens/second.

use pacer_core::{PacerError, ResourceKind};
use std::time::Duration;
use tokio::time::Instant;

/// Tolerance for float rounding when checking a debit
const DEBIT_EPSILON: f64 = 1e-9;

/// A single quota counter with token-bucket semantics
#[derive(Debug, Clone)]
pub struct ResourceBucket {
    kind: ResourceKind,
    capacity: f64,
    tokens: f64,
    refill_rate: f64,
    last_refill: Instant,
}

impl ResourceBucket {
    /// Create a full bucket from a per-minute limit
    #[must_use]
    pub fn per_minute(kind: ResourceKind, limit: u32) -> Self {
        let capacity = f64::from(limit);
        Self {
            kind,
            capacity,
            tokens: capacity,
            refill_rate: capacity / 60.0,
            last_refill: Instant::now(),
        }
    }

    /// Advance the bucket to `now`, crediting tokens for the elapsed time.
    /// Idempotent when called twice at the same instant.
    pub fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        self.tokens = (self.tokens + elapsed.as_secs_f64() * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Minimum wait until `n` tokens are available, assuming no other
    /// consumer intervenes. Zero when the bucket already covers `n`.
    pub fn time_until(&mut self, n: f64, now: Instant) -> Duration {
        self.refill(now);
        if self.tokens >= n {
            return Duration::ZERO;
        }
        if self.refill_rate <= 0.0 {
            return Duration::MAX;
        }
        Duration::from_secs_f64((n - self.tokens) / self.refill_rate)
    }

    /// Remove `n` tokens
    ///
    /// # Errors
    /// `InsufficientTokens` if the bucket cannot cover `n` after refill.
    /// Under an honored `time_until` this never happens; it indicates an
    /// accounting bug rather than an operational condition.
    pub fn debit(&mut self, n: f64, now: Instant) -> Result<(), PacerError> {
        self.refill(now);
        if self.tokens + DEBIT_EPSILON < n {
            return Err(PacerError::InsufficientTokens {
                resource: self.kind,
                requested: n,
                available: self.tokens,
            });
        }
        self.tokens = (self.tokens - n).max(0.0);
        Ok(())
    }

    /// Remove up to `n` tokens, clamping at zero; returns the shortfall.
    ///
    /// Used at settlement, where the usage reported by the remote service is
    /// authoritative and must never be rejected post hoc.
    pub fn saturating_debit(&mut self, n: f64, now: Instant) -> f64 {
        self.refill(now);
        let shortfall = (n - self.tokens).max(0.0);
        self.tokens = (self.tokens - n).max(0.0);
        shortfall
    }

    /// Tokens available as of the last refill
    #[must_use]
    pub fn available(&self) -> f64 {
        self.tokens
    }

    /// Maximum tokens the bucket can hold
    #[must_use]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Quota dimension this bucket meters
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}
