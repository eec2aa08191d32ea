//! Random artwork selection.

use super::CollectionSource;
use crate::error::{PipelineError, PipelineResult};
use crate::types::QualifiedArtwork;
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick random ids from the full listing until one has an image.
///
/// Records without an image and ids the catalog no longer knows are skipped.
/// Transport and parse failures abort immediately. Gives up with
/// `NoImageFound` after `max_attempts` records.
pub async fn select_with_image<R: Rng + ?Sized>(
    source: &dyn CollectionSource,
    rng: &mut R,
    max_attempts: u32,
) -> PipelineResult<QualifiedArtwork> {
    let ids = source.fetch_all_ids().await?;
    if ids.is_empty() {
        return Err(PipelineError::Fetch {
            url: source.name().to_string(),
            message: "collection listing contained no object ids".to_string(),
        });
    }

    for attempt in 1..=max_attempts {
        let Some(&id) = ids.choose(rng) else {
            break;
        };
        match source.fetch_record(id).await {
            Ok(record) => match QualifiedArtwork::from_record(record) {
                Ok(artwork) => {
                    tracing::debug!("Selected artwork {id} on attempt {attempt}");
                    return Ok(artwork);
                }
                Err(_) => tracing::info!("No image for ID {id}, trying another."),
            },
            Err(PipelineError::ArtworkNotFound { .. }) => {
                tracing::info!("ID {id} is not a valid object, trying another.");
            }
            Err(e) => return Err(e),
        }
    }

    Err(PipelineError::NoImageFound {
        attempts: max_attempts,
    })
}

/// Fetch one pre-selected id, yielding `None` when it cannot be posted.
pub async fn fetch_candidate(
    source: &dyn CollectionSource,
    id: u64,
) -> PipelineResult<Option<QualifiedArtwork>> {
    match source.fetch_record(id).await {
        Ok(record) => Ok(QualifiedArtwork::from_record(record).ok()),
        Err(PipelineError::ArtworkNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
