//! Multi-resource admission: check, wait, and debit across all three quota
//! dimensions as one critical section.
//!
//! Input cost is fully known before the call (the prompt is fixed), so the
//! request and input buckets are debited at acquire time. Output cost is only
//! an estimate until the service reports actual usage, so the output bucket
//! is checked at acquire time but debited at settle time.

use crate::bucket::ResourceBucket;
use pacer_core::{PacerError, QuotaConfig, RequestCost, ResourceKind};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Wait-recheck cycles before the gate reports itself stalled
const MAX_WAIT_CYCLES: u32 = 16;

/// Slack added to each computed wait so the recheck lands after the refill
/// it waited for, instead of a hair before it
const WAIT_SLACK: Duration = Duration::from_millis(10);

struct BucketSet {
    requests: ResourceBucket,
    input: ResourceBucket,
    output: ResourceBucket,
}

impl BucketSet {
    fn longest_wait(&mut self, cost: &RequestCost, now: Instant) -> Duration {
        let request_wait = self.requests.time_until(f64::from(cost.requests), now);
        let input_wait = self.input.time_until(f64::from(cost.input_tokens), now);
        let output_wait = self
            .output
            .time_until(f64::from(cost.output_tokens_estimate), now);
        request_wait.max(input_wait).max(output_wait)
    }
}

/// Admission gate holding one token bucket per quota dimension.
///
/// All bucket reads and writes go through a single lock, so check-and-debit
/// for the triple stays one atomic critical section even if concurrent
/// callers are introduced. The lock is never held across a sleep.
pub struct AdmissionGate {
    buckets: Mutex<BucketSet>,
}

impl AdmissionGate {
    /// Create a gate with full buckets sized from the per-minute quotas
    #[must_use]
    pub fn new(quotas: &QuotaConfig) -> Self {
        Self {
            buckets: Mutex::new(BucketSet {
                requests: ResourceBucket::per_minute(
                    ResourceKind::Requests,
                    quotas.requests_per_minute,
                ),
                input: ResourceBucket::per_minute(
                    ResourceKind::InputTokens,
                    quotas.input_tokens_per_minute,
                ),
                output: ResourceBucket::per_minute(
                    ResourceKind::OutputTokens,
                    quotas.output_tokens_per_minute,
                ),
            }),
        }
    }

    /// Block until `cost` fits within all three quotas, then debit the
    /// request and input buckets. The output bucket is only checked against
    /// the estimate; its debit is deferred to [`settle`](Self::settle).
    ///
    /// # Errors
    /// Returns `Stalled` if the wait loop fails to converge within its cycle
    /// cap (clock anomaly, or a demand no refill can ever cover), and
    /// `InsufficientTokens` only on an internal accounting bug.
    pub async fn acquire(&self, cost: &RequestCost) -> Result<(), PacerError> {
        for cycle in 0..MAX_WAIT_CYCLES {
            let wait = {
                let mut buckets = self.buckets.lock();
                let now = Instant::now();
                let wait = buckets.longest_wait(cost, now);
                if wait.is_zero() {
                    buckets.requests.debit(f64::from(cost.requests), now)?;
                    buckets.input.debit(f64::from(cost.input_tokens), now)?;
                    return Ok(());
                }
                wait
            };
            debug!(
                cycle,
                wait_ms = wait.as_millis() as u64,
                input_tokens = cost.input_tokens,
                output_estimate = cost.output_tokens_estimate,
                "quota headroom exhausted, pacing"
            );
            sleep(wait.saturating_add(WAIT_SLACK)).await;
        }
        warn!(
            cycles = MAX_WAIT_CYCLES,
            input_tokens = cost.input_tokens,
            output_estimate = cost.output_tokens_estimate,
            "admission wait did not converge"
        );
        Err(PacerError::Stalled {
            cycles: MAX_WAIT_CYCLES,
        })
    }

    /// Debit the output bucket with the completion size reported by the
    /// service.
    ///
    /// Reported usage is authoritative and must never be rejected post hoc,
    /// so when the estimate reserved too little the debit clamps the bucket
    /// at zero instead of failing.
    pub fn settle(&self, actual_output_tokens: u32) {
        let mut buckets = self.buckets.lock();
        let shortfall = buckets
            .output
            .saturating_debit(f64::from(actual_output_tokens), Instant::now());
        if shortfall > 0.0 {
            warn!(
                actual_output_tokens,
                shortfall, "reported usage drained the output bucket past zero"
            );
        }
    }

    /// Available tokens per quota dimension, as of now
    #[must_use]
    pub fn headroom(&self) -> GateHeadroom {
        let mut buckets = self.buckets.lock();
        let now = Instant::now();
        buckets.requests.refill(now);
        buckets.input.refill(now);
        buckets.output.refill(now);
        GateHeadroom {
            requests: buckets.requests.available(),
            input_tokens: buckets.input.available(),
            output_tokens: buckets.output.available(),
        }
    }
}

/// Point-in-time available headroom per quota dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateHeadroom {
    /// Request slots available
    pub requests: f64,
    /// Prompt tokens available
    pub input_tokens: f64,
    /// Completion tokens available
    pub output_tokens: f64,
}
