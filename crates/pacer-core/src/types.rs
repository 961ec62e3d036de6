//! Domain value types shared across the pacing crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three quota dimensions the admission gate enforces independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Request count (RPM)
    Requests,
    /// Prompt tokens (input TPM)
    InputTokens,
    /// Completion tokens (output TPM)
    OutputTokens,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requests => write!(f, "requests"),
            Self::InputTokens => write!(f, "input_tokens"),
            Self::OutputTokens => write!(f, "output_tokens"),
        }
    }
}

/// Pre-flight cost of a single call attempt.
///
/// The input cost is exact because the prompt is fixed before the call; the
/// output cost is only an estimate and is checked, not reserved, at
/// admission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCost {
    /// Requests consumed by one attempt
    pub requests: u32,

    /// Exact prompt token cost
    pub input_tokens: u32,

    /// Estimated completion token cost
    pub output_tokens_estimate: u32,
}

impl RequestCost {
    /// Create the cost of a single request
    #[must_use]
    pub fn new(input_tokens: u32, output_tokens_estimate: u32) -> Self {
        Self {
            requests: 1,
            input_tokens,
            output_tokens_estimate,
        }
    }
}

/// Per-call identifier carried through log context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(String);

impl CallId {
    /// Generate a new UUID-based call ID
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner value as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::generate()
    }
}
