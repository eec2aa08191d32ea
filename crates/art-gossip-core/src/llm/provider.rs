//! LLM provider trait and request/response types.

use crate::error::PipelineError;
use async_trait::async_trait;
use std::time::Duration;

/// Substituted when the model returns an empty completion.
pub const EMPTY_COMPLETION_PLACEHOLDER: &str = "No information available.";

/// A single text-generation request.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// System role message
    pub system: String,
    /// User role message
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            max_tokens: 300,
            temperature: 0.7,
        }
    }

    pub fn with_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }
}

/// The response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text (never empty, see [`EMPTY_COMPLETION_PLACEHOLDER`])
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Generate a completion for the given request.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Trim a completion, falling back to the placeholder when nothing is left.
pub(crate) fn normalize_completion(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        EMPTY_COMPLETION_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_and_limits() {
        let request = LlmRequest::new("system", "prompt");
        assert_eq!(request.max_tokens, 300);

        let request = request.with_limits(120, 0.2);
        assert_eq!(request.max_tokens, 120);
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_normalize_completion() {
        assert_eq!(normalize_completion("  $5,000  \n"), "$5,000");
        assert_eq!(normalize_completion(""), EMPTY_COMPLETION_PLACEHOLDER);
        assert_eq!(normalize_completion(" \n\t"), EMPTY_COMPLETION_PLACEHOLDER);
    }
}
