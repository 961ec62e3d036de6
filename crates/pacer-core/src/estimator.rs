//! Heuristic token cost estimation.
//!
//! Approximates the remote tokenizer without a network round trip. The
//! heuristics lean high on purpose: an overestimate merely reserves extra
//! headroom, while an underestimate can push a call over quota.

use crate::config::EstimatorConfig;
use crate::types::RequestCost;

/// Deterministic, side-effect-free token cost estimator
#[derive(Debug, Clone)]
pub struct TokenEstimator {
    tokens_per_word: u32,
    output_input_ratio: u32,
    max_output_estimate: u32,
}

impl TokenEstimator {
    /// Create an estimator from configuration
    #[must_use]
    pub fn new(config: &EstimatorConfig) -> Self {
        Self {
            tokens_per_word: config.tokens_per_word,
            output_input_ratio: config.output_input_ratio,
            max_output_estimate: config.max_output_estimate,
        }
    }

    /// Estimate the prompt token cost of `text`
    #[must_use]
    pub fn estimate_input(&self, text: &str) -> u32 {
        let words = u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX);
        words.saturating_mul(self.tokens_per_word)
    }

    /// Estimate the completion token cost from the prompt cost
    #[must_use]
    pub fn estimate_output(&self, input_tokens: u32) -> u32 {
        input_tokens
            .saturating_mul(self.output_input_ratio)
            .min(self.max_output_estimate)
    }

    /// Build the full pre-flight cost for a prompt
    #[must_use]
    pub fn estimate_cost(&self, text: &str) -> RequestCost {
        let input_tokens = self.estimate_input(text);
        RequestCost::new(input_tokens, self.estimate_output(input_tokens))
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new(&EstimatorConfig::default())
    }
}
