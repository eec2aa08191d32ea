//! Enrichment: short description and price estimate for an artwork.
//!
//! Two interchangeable backends implement [`EnrichmentProvider`]:
//! [`CacheEnricher`] reads a pre-built snapshot keyed by object id, and
//! [`GenerativeEnricher`] asks an LLM three questions in sequence.

mod cache;
mod generative;
pub mod pricing;
mod prompts;

pub use cache::{CacheEnricher, CachedArtwork};
pub use generative::GenerativeEnricher;

use crate::error::PipelineError;
use crate::types::{ArtworkRecord, EnrichmentResult};
use async_trait::async_trait;

/// Source of descriptions and price estimates.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// The only object ids this provider can enrich, if it is restricted.
    ///
    /// `None` means any record from the collection is acceptable.
    fn candidate_ids(&self) -> Option<Vec<u64>>;

    /// Produce the enrichment for one record.
    async fn enrich(&self, record: &ArtworkRecord) -> Result<EnrichmentResult, PipelineError>;
}
