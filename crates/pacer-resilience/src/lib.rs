//! # Pacer Resilience
//!
//! Admission and recovery machinery for paced remote calls:
//! - Continuous-refill token buckets, one per quota dimension
//! - A multi-resource admission gate with precise wait computation
//! - Bounded exponential-backoff retry over classified failures

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod admission;
pub mod bucket;
pub mod retry;

// Re-export main types
pub use admission::{AdmissionGate, GateHeadroom};
pub use bucket::ResourceBucket;
pub use retry::{RetryOutcome, RetryPolicy};
