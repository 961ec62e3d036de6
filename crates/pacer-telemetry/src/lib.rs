//! # Pacer Telemetry
//!
//! Observability for the pacing engine:
//! - Process-lifetime usage accounting with monotonic counters
//! - Structured logging initialization

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod logging;
pub mod usage;

// Re-export main types
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
pub use usage::{UsageLedger, UsageSnapshot};
