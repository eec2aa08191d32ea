//! LLM-backed enrichment: description, price range, then a point estimate.
//!
//! The three calls run strictly in order because the last prompt embeds the
//! range produced by the second. Any failure aborts the enrichment; there is
//! no retry.

use super::{pricing, prompts, EnrichmentProvider};
use crate::config::LlmConfig;
use crate::error::PipelineError;
use crate::llm::{LlmProvider, LlmRequest};
use crate::types::{ArtworkRecord, EnrichmentResult};
use async_trait::async_trait;

/// Descriptions longer than this are truncated at a char boundary.
const MAX_DESCRIPTION_CHARS: usize = 400;

/// Enrichment generated on demand through an [`LlmProvider`].
pub struct GenerativeEnricher {
    provider: Box<dyn LlmProvider>,
    max_tokens: u32,
    temperature: f32,
}

impl GenerativeEnricher {
    pub fn new(provider: Box<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    async fn ask(&self, stage: &'static str, prompt: String) -> Result<String, PipelineError> {
        let request = LlmRequest::new(prompts::SYSTEM_PROMPT, prompt)
            .with_limits(self.max_tokens, self.temperature);
        let response = self
            .provider
            .generate(&request)
            .await
            .map_err(|e| e.in_stage(stage))?;

        tracing::debug!(
            "{stage} generated by {} in {}ms ({} tokens)",
            response.model,
            response.latency_ms,
            response
                .tokens_used
                .map_or_else(|| "?".to_string(), |t| t.to_string())
        );
        Ok(response.text)
    }
}

fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text,
    }
}

#[async_trait]
impl EnrichmentProvider for GenerativeEnricher {
    fn name(&self) -> &str {
        "generative"
    }

    fn candidate_ids(&self) -> Option<Vec<u64>> {
        None
    }

    async fn enrich(&self, record: &ArtworkRecord) -> Result<EnrichmentResult, PipelineError> {
        let details = record.detail_text();
        tracing::info!(
            "Generating enrichment for artwork {} via {}",
            record.object_id,
            self.provider.name()
        );

        let description = self
            .ask("description", prompts::description(&details))
            .await?;
        let range = self
            .ask("price range", prompts::price_range(&details))
            .await?;
        let price = self
            .ask("single price", prompts::single_price(&details, &range))
            .await?;

        match pricing::point_within_range(&price, &range) {
            Some(true) => {}
            Some(false) => {
                tracing::warn!("Generated price {price} falls outside range {range}")
            }
            None => tracing::debug!("Could not parse price {price:?} against range {range:?}"),
        }

        Ok(EnrichmentResult {
            short_description: truncate_chars(description, MAX_DESCRIPTION_CHARS),
            price_range: Some(range),
            price,
        })
    }
}
