use crate::config::LlmConfig;
use crate::models::TokenUsage;

/// Per-1K-token USD rates for a chat model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub prompt_cost_per_1k: f64,
    pub completion_cost_per_1k: f64,
}

impl Pricing {
    pub const fn new(prompt_cost_per_1k: f64, completion_cost_per_1k: f64) -> Self {
        Self {
            prompt_cost_per_1k,
            completion_cost_per_1k,
        }
    }

    pub const fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.prompt_cost_per_1k, config.completion_cost_per_1k)
    }

    /// Estimated USD cost of one call
    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        f64::from(usage.prompt_tokens) / 1000.0 * self.prompt_cost_per_1k
            + f64::from(usage.completion_tokens) / 1000.0 * self.completion_cost_per_1k
    }
}

impl Default for Pricing {
    /// gpt-3.5-turbo list prices
    fn default() -> Self {
        Self::new(0.0005, 0.0015)
    }
}
