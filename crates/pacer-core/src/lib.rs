//! # Pacer Core
//!
//! Shared types for the LLM call pacing engine:
//! - Error taxonomy with retryable/fatal classification
//! - Request cost and quota resource types
//! - The `RemoteModel` seam to the remote generative service
//! - Heuristic token cost estimation
//! - Configuration schema with validation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod estimator;
pub mod model;
pub mod types;

// Re-export main types
pub use config::{EstimatorConfig, PacerConfig, QuotaConfig, RetryConfig};
pub use error::{PacerError, PacerResult};
pub use estimator::TokenEstimator;
pub use model::{Completion, RemoteModel};
pub use types::{CallId, RequestCost, ResourceKind};
