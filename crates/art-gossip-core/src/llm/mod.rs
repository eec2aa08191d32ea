//! LLM integration for artwork description and price generation.
//!
//! Provides a provider abstraction over OpenAI-compatible chat completion
//! backends. Each call is a single system + user message exchange with no
//! streaming and no retry.

pub(crate) mod openai;
pub(crate) mod provider;

pub use openai::OpenAiProvider;
pub use provider::{LlmProvider, LlmRequest, LlmResponse, EMPTY_COMPLETION_PLACEHOLDER};
