//! Post caption template.

use crate::types::{field_or, ArtworkRecord, EnrichmentResult};

/// Shown when the record has no title.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Shown when the record has no artist.
pub const DEFAULT_ARTIST: &str = "Unknown Artist";

const CALL_TO_ACTION: &str =
    "dive deeper into art history and more price estimates:\n👉 https://art-gossip.com";

const HASHTAGS: &str = "#ArtGossip #ArtHistory #MetMuseum #ArtTrivia";

/// Build the post caption for an artwork.
pub fn compose(record: &ArtworkRecord, enrichment: &EnrichmentResult) -> String {
    let title = field_or(&record.title, DEFAULT_TITLE);
    let artist = field_or(&record.artist, DEFAULT_ARTIST);

    [
        format!("if we really had to price it: {} 💰", enrichment.price),
        format!("🎨 {title} by {artist}"),
        format!("fun fact: {}", enrichment.short_description),
        CALL_TO_ACTION.to_string(),
        HASHTAGS.to_string(),
    ]
    .join("\n\n")
}
