//! Bounded retry with exponential backoff over classified failures.
//!
//! The controller never decides admission itself: the operation it runs is
//! expected to re-acquire the admission gate on every invocation, so a burst
//! of retries cannot bypass the quota it is recovering from.

use pacer_core::{PacerError, RetryConfig};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Outcome of a retried operation
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// The success value, the fatal error, or the last retryable error once
    /// the budget is exhausted
    pub result: Result<T, PacerError>,
    /// Attempts executed, including the first
    pub attempts: u32,
}

impl<T> RetryOutcome<T> {
    /// Retries performed after the initial attempt
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

/// Retry controller: classifies failures and paces re-attempts
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a policy from configuration
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Backoff delay before the retry that follows `attempt` (0-based),
    /// prior to jitter: `min(max_backoff, base_backoff * 2^attempt)`
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.config
            .base_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.config.max_backoff)
    }

    /// [`delay_for`](Self::delay_for) with the configured jitter applied,
    /// scaling the delay into `[(1 - jitter) * d, d]`
    #[must_use]
    pub fn jittered_delay_for(&self, attempt: u32) -> Duration {
        let delay = self.delay_for(attempt);
        if self.config.jitter <= 0.0 {
            return delay;
        }
        let scale = 1.0 - self.config.jitter * rand::thread_rng().gen::<f64>();
        delay.mul_f64(scale)
    }

    /// Run `op` until it succeeds, fails fatally, or exhausts the retry
    /// budget. `op` receives the 0-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> RetryOutcome<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, PacerError>>,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => {
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt + 1,
                    };
                }
                Err(err) if err.is_retryable() => {
                    if attempt >= self.config.max_retries {
                        warn!(
                            attempts = attempt + 1,
                            kind = err.kind(),
                            error = %err,
                            "retry budget exhausted"
                        );
                        return RetryOutcome {
                            result: Err(err),
                            attempts: attempt + 1,
                        };
                    }
                    let delay = self.jittered_delay_for(attempt);
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        kind = err.kind(),
                        error = %err,
                        "transient failure, backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(
                        attempts = attempt + 1,
                        kind = err.kind(),
                        error = %err,
                        "fatal failure, not retrying"
                    );
                    return RetryOutcome {
                        result: Err(err),
                        attempts: attempt + 1,
                    };
                }
            }
        }
    }
}
