//! Museum collection access and random artwork selection.
//!
//! [`CollectionSource`] is the seam between the run and the remote catalog;
//! [`MetMuseumClient`] implements it over The Met Collection API.

mod met;
mod select;

pub use met::MetMuseumClient;
pub use select::{fetch_candidate, select_with_image};

use crate::error::PipelineError;
use crate::types::ArtworkRecord;
use async_trait::async_trait;

/// Read access to a museum collection catalog.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Every object id in the collection.
    async fn fetch_all_ids(&self) -> Result<Vec<u64>, PipelineError>;

    /// One object record by id.
    ///
    /// Returns `ArtworkNotFound` when the catalog has no such object.
    async fn fetch_record(&self, id: u64) -> Result<ArtworkRecord, PipelineError>;
}
