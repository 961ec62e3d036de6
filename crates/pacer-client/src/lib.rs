//! # Pacer Client
//!
//! The facade over the pacing engine. One `PacerClient` per remote model:
//! it estimates pre-flight cost, admits each call against the RPM and TPM
//! quotas, runs the remote call under the retry policy, settles actual
//! output usage, and keeps the usage ledger.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;

pub use client::PacerClient;

// Re-export the types callers need to construct and drive a client
pub use pacer_core::{
    Completion, EstimatorConfig, PacerConfig, PacerError, PacerResult, QuotaConfig, RemoteModel,
    RequestCost, RetryConfig,
};
pub use pacer_resilience::GateHeadroom;
pub use pacer_telemetry::UsageSnapshot;
