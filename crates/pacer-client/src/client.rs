//! The paced call pipeline: estimate → admit → call with retry → settle →
//! record.

use pacer_core::{
    CallId, Completion, PacerConfig, PacerError, RemoteModel, RequestCost, TokenEstimator,
};
use pacer_resilience::{AdmissionGate, GateHeadroom, RetryPolicy};
use pacer_telemetry::{UsageLedger, UsageSnapshot};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Paced client for one remote generative model.
///
/// Every call flows through the same pipeline: admission against all three
/// quotas, the remote call under the retry policy (each retry re-acquires
/// admission), settlement of the reported output usage, and ledger
/// accounting. Admission debits are permanent: a retried call genuinely
/// consumes additional quota.
pub struct PacerClient {
    model: Arc<dyn RemoteModel>,
    estimator: TokenEstimator,
    gate: AdmissionGate,
    retry: RetryPolicy,
    ledger: UsageLedger,
}

impl std::fmt::Debug for PacerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacerClient")
            .field("model", &self.model.name())
            .finish_non_exhaustive()
    }
}

impl PacerClient {
    /// Create a client from validated configuration
    ///
    /// # Errors
    /// Returns `Configuration` if any config section holds an out-of-range
    /// value
    pub fn new(config: PacerConfig, model: Arc<dyn RemoteModel>) -> Result<Self, PacerError> {
        config
            .validate_config()
            .map_err(|e| PacerError::configuration(e.to_string()))?;

        info!(
            model = model.name(),
            rpm = config.quotas.requests_per_minute,
            input_tpm = config.quotas.input_tokens_per_minute,
            output_tpm = config.quotas.output_tokens_per_minute,
            max_retries = config.retry.max_retries,
            "pacer client initialized"
        );

        let ledger = UsageLedger::new(model.name());
        Ok(Self {
            model,
            estimator: TokenEstimator::new(&config.estimator),
            gate: AdmissionGate::new(&config.quotas),
            retry: RetryPolicy::new(config.retry),
            ledger,
        })
    }

    /// Pre-flight cost of `prompt`
    #[must_use]
    pub fn estimate_cost(&self, prompt: &str) -> RequestCost {
        self.estimator.estimate_cost(prompt)
    }

    /// Execute one paced call with a pre-computed cost.
    ///
    /// # Errors
    /// Fatal classifications surface immediately; retryable ones surface
    /// once the retry budget is exhausted. Either way the terminal error is
    /// counted in the ledger before it propagates.
    pub async fn execute(&self, prompt: &str, cost: &RequestCost) -> Result<Completion, PacerError> {
        let call_id = CallId::generate();
        let started = tokio::time::Instant::now();

        let outcome = self
            .retry
            .run(|attempt| {
                let gate = &self.gate;
                let model = &self.model;
                let call_id = &call_id;
                async move {
                    debug!(call_id = %call_id, attempt, "dispatching remote call");
                    gate.acquire(cost).await?;
                    model.generate(prompt).await
                }
            })
            .await;

        self.ledger.record_retries(u64::from(outcome.retries()));

        match outcome.result {
            Ok(completion) => {
                match completion.output_tokens {
                    Some(tokens) => self.gate.settle(tokens),
                    None => warn!(
                        call_id = %call_id,
                        "response carried no usage metadata, output quota left unsettled"
                    ),
                }
                self.ledger.record_success(
                    u64::from(cost.input_tokens),
                    u64::from(completion.output_tokens.unwrap_or(0)),
                );
                info!(
                    call_id = %call_id,
                    duration_ms = started.elapsed().as_millis() as u64,
                    attempts = outcome.attempts,
                    input_tokens = cost.input_tokens,
                    output_tokens = completion.output_tokens.unwrap_or(0),
                    "call succeeded"
                );
                Ok(completion)
            }
            Err(err) => {
                self.ledger.record_error();
                error!(
                    call_id = %call_id,
                    duration_ms = started.elapsed().as_millis() as u64,
                    attempts = outcome.attempts,
                    kind = err.kind(),
                    error = %err,
                    "call failed"
                );
                Err(err)
            }
        }
    }

    /// Estimate and execute in one step
    ///
    /// # Errors
    /// Same as [`execute`](Self::execute)
    pub async fn generate(&self, prompt: &str) -> Result<Completion, PacerError> {
        let cost = self.estimate_cost(prompt);
        self.execute(prompt, &cost).await
    }

    /// Usage counters accumulated over the client's lifetime
    #[must_use]
    pub fn usage_summary(&self) -> UsageSnapshot {
        self.ledger.snapshot()
    }

    /// Remaining quota headroom per dimension, as of now
    #[must_use]
    pub fn quota_headroom(&self) -> GateHeadroom {
        self.gate.headroom()
    }

    /// Name of the model behind this client
    #[must_use]
    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}
