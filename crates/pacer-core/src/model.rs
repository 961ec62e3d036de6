//! The seam to the remote generative service.
//!
//! Implementations own transport, authentication, and response decoding; the
//! pacing engine only sees the classified outcome and the reported usage.

use crate::error::PacerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One completed generation from the remote service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// Generated text
    pub text: String,

    /// Completion token count reported by the service. `None` when the
    /// response carried no usage metadata; such output goes unaccounted
    /// against the output quota.
    pub output_tokens: Option<u32>,
}

impl Completion {
    /// Create a completion with reported usage
    #[must_use]
    pub fn new(text: impl Into<String>, output_tokens: u32) -> Self {
        Self {
            text: text.into(),
            output_tokens: Some(output_tokens),
        }
    }

    /// Create a completion whose response carried no usage metadata
    #[must_use]
    pub fn without_usage(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            output_tokens: None,
        }
    }
}

/// Abstract remote generation capability
///
/// One implementation per backing service. Errors must arrive already
/// classified (see [`PacerError::from_status`]) so the retry controller can
/// separate transient faults from fatal ones.
#[async_trait]
pub trait RemoteModel: Send + Sync + 'static {
    /// Model name, recorded in usage summaries
    fn name(&self) -> &str;

    /// Execute one generation attempt
    ///
    /// # Errors
    /// Returns a classified `PacerError`; `RateLimited` and `Server` are
    /// treated as transient by the retry controller, everything else as
    /// fatal.
    async fn generate(&self, prompt: &str) -> Result<Completion, PacerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_with_usage() {
        let completion = Completion::new("hello", 12);
        assert_eq!(completion.text, "hello");
        assert_eq!(completion.output_tokens, Some(12));
    }

    #[test]
    fn test_completion_without_usage() {
        let completion = Completion::without_usage("hello");
        assert_eq!(completion.output_tokens, None);
    }

    #[test]
    fn test_completion_serialization() {
        let completion = Completion::new("hi", 3);
        let json = serde_json::to_string(&completion).expect("serialize");
        let parsed: Completion = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.text, "hi");
        assert_eq!(parsed.output_tokens, Some(3));
    }
}
