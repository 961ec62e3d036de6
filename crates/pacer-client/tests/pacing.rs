//! End-to-end tests for the paced call pipeline, driven by a scripted mock
//! model under paused tokio time.

use async_trait::async_trait;
use pacer_client::{
    Completion, PacerClient, PacerConfig, PacerError, QuotaConfig, RemoteModel, RetryConfig,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Mock model that replays a fixed script of outcomes
struct ScriptedModel {
    outcomes: Mutex<VecDeque<Result<Completion, PacerError>>>,
}

impl ScriptedModel {
    fn new(outcomes: Vec<Result<Completion, PacerError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
        })
    }

    fn remaining(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, _prompt: &str) -> Result<Completion, PacerError> {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted")
    }
}

fn client_with(
    model: Arc<ScriptedModel>,
    quotas: QuotaConfig,
    retry: RetryConfig,
) -> PacerClient {
    let config = PacerConfig::new().with_quotas(quotas).with_retry(retry);
    PacerClient::new(config, model).expect("valid config")
}

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        base_backoff: Duration::from_secs(1),
        max_backoff: Duration::from_secs(30),
        jitter: 0.0,
    }
}

#[tokio::test(start_paused = true)]
async fn test_server_errors_then_success_count_one_request() {
    let model = ScriptedModel::new(vec![
        Err(PacerError::server(Some(503), "overloaded")),
        Err(PacerError::server(Some(500), "internal")),
        Ok(Completion::new("analysis complete", 40)),
    ]);
    let client = client_with(model.clone(), QuotaConfig::default(), fast_retry(3));

    let prompt = "summarize this document";
    let cost = client.estimate_cost(prompt);
    let started = Instant::now();
    let completion = client.execute(prompt, &cost).await.expect("third attempt");

    // Backoffs of 1s then 2s before the successful attempt
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3), "slept {elapsed:?}");
    assert!(elapsed < Duration::from_millis(3500), "slept {elapsed:?}");

    assert_eq!(completion.text, "analysis complete");
    let usage = client.usage_summary();
    assert_eq!(usage.model, "scripted-model");
    assert_eq!(usage.total_requests, 1);
    assert_eq!(usage.total_errors, 0);
    assert_eq!(usage.total_retries, 2);
    assert_eq!(usage.total_input_tokens, u64::from(cost.input_tokens));
    assert_eq!(usage.total_output_tokens, 40);
    assert_eq!(model.remaining(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_client_error_fails_fast_and_counts_one_error() {
    let model = ScriptedModel::new(vec![
        Err(PacerError::client(Some(400), "malformed request")),
        Ok(Completion::new("never reached", 1)),
    ]);
    let client = client_with(model.clone(), QuotaConfig::default(), fast_retry(3));

    let started = Instant::now();
    let err = client.generate("bad prompt").await.expect_err("fatal");
    assert!(matches!(err, PacerError::Client { .. }));
    assert_eq!(started.elapsed(), Duration::ZERO);

    let usage = client.usage_summary();
    assert_eq!(usage.total_errors, 1);
    assert_eq!(usage.total_requests, 0);
    assert_eq!(usage.total_retries, 0);
    // The second scripted outcome was never consumed
    assert_eq!(model.remaining(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_surface_the_last_error() {
    let model = ScriptedModel::new(vec![
        Err(PacerError::server(Some(503), "overloaded")),
        Err(PacerError::server(Some(503), "still overloaded")),
        Err(PacerError::rate_limited("quota exceeded")),
    ]);
    let client = client_with(model.clone(), QuotaConfig::default(), fast_retry(2));

    let err = client.generate("prompt").await.expect_err("exhausted");
    assert!(matches!(err, PacerError::RateLimited { .. }));

    let usage = client.usage_summary();
    assert_eq!(usage.total_errors, 1);
    assert_eq!(usage.total_requests, 0);
    assert_eq!(usage.total_retries, 2);
    assert_eq!(model.remaining(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_sixteenth_call_is_paced_by_the_request_quota() {
    let outcomes = (0..16).map(|_| Ok(Completion::new("ok", 0))).collect();
    let model = ScriptedModel::new(outcomes);
    let client = client_with(model, QuotaConfig::default(), fast_retry(0));

    // An empty prompt has zero estimated cost, isolating the request quota
    let cost = client.estimate_cost("");
    assert_eq!(cost.input_tokens, 0);
    assert_eq!(cost.output_tokens_estimate, 0);

    let started = Instant::now();
    for _ in 0..15 {
        client.execute("", &cost).await.expect("within quota");
    }
    assert_eq!(started.elapsed(), Duration::ZERO);

    client.execute("", &cost).await.expect("paced");
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(4), "waited {elapsed:?}");
    assert!(elapsed < Duration::from_millis(4500), "waited {elapsed:?}");

    assert_eq!(client.usage_summary().total_requests, 16);
}

#[tokio::test(start_paused = true)]
async fn test_each_retry_re_acquires_admission() {
    let model = ScriptedModel::new(vec![
        Err(PacerError::rate_limited("remote throttle")),
        Ok(Completion::new("ok", 5)),
    ]);
    // Two request slots: the retry consumes the second one
    let client = client_with(
        model,
        QuotaConfig {
            requests_per_minute: 2,
            ..Default::default()
        },
        fast_retry(1),
    );

    client.generate("hi there").await.expect("second attempt");

    let usage = client.usage_summary();
    assert_eq!(usage.total_requests, 1);
    assert_eq!(usage.total_retries, 1);
    // Both admission debits are permanent
    let headroom = client.quota_headroom();
    assert!(headroom.requests < 1.0, "headroom {headroom:?}");
}

#[tokio::test(start_paused = true)]
async fn test_settlement_uses_reported_usage_not_the_estimate() {
    let model = ScriptedModel::new(vec![Ok(Completion::new("short answer", 10))]);
    let client = client_with(
        model,
        QuotaConfig {
            output_tokens_per_minute: 100,
            ..Default::default()
        },
        fast_retry(0),
    );

    // Estimate will be far above the actual 10 tokens
    let prompt = "please write a very long and detailed report about everything";
    client.generate(prompt).await.expect("success");

    let headroom = client.quota_headroom();
    assert!((headroom.output_tokens - 90.0).abs() < 0.001, "{headroom:?}");
}

#[tokio::test(start_paused = true)]
async fn test_missing_usage_metadata_counts_zero_output() {
    let model = ScriptedModel::new(vec![Ok(Completion::without_usage("text"))]);
    let client = client_with(model, QuotaConfig::default(), fast_retry(0));

    client.generate("hello world").await.expect("success");

    let usage = client.usage_summary();
    assert_eq!(usage.total_requests, 1);
    assert_eq!(usage.total_output_tokens, 0);
    // Nothing was settled against the output bucket
    let headroom = client.quota_headroom();
    assert!((headroom.output_tokens - 32_000.0).abs() < 0.001);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_config_is_rejected_at_construction() {
    let model = ScriptedModel::new(vec![]);
    let config = PacerConfig::new().with_quotas(QuotaConfig {
        requests_per_minute: 0,
        ..Default::default()
    });
    let err = PacerClient::new(config, model).expect_err("invalid");
    assert!(matches!(err, PacerError::Configuration { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_usage_summary_serializes_for_reporting() {
    let model = ScriptedModel::new(vec![Ok(Completion::new("ok", 7))]);
    let client = client_with(model, QuotaConfig::default(), fast_retry(0));
    client.generate("two words").await.expect("success");

    let json = serde_json::to_string(&client.usage_summary()).expect("serialize");
    assert!(json.contains("\"total_requests\":1"));
    assert!(json.contains("\"total_output_tokens\":7"));
}
