//! Core data types for the Art Gossip posting pipeline.
//!
//! An [`ArtworkRecord`] is what the collection API returns; a
//! [`QualifiedArtwork`] is a record proven to have an image and is the only
//! thing the publisher accepts.

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel substituted for any missing descriptive field.
pub const UNKNOWN: &str = "Unknown";

/// Return the field value, or `default` when it is absent.
pub fn field_or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().unwrap_or(default)
}

/// Treat `null`, `""` and whitespace-only strings as absent.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

/// One object from the museum collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    #[serde(rename = "objectID")]
    pub object_id: u64,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub title: Option<String>,

    #[serde(
        rename = "artistDisplayName",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub artist: Option<String>,

    #[serde(
        rename = "artistDisplayBio",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub artist_bio: Option<String>,

    #[serde(
        rename = "artistNationality",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub artist_nationality: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub medium: Option<String>,

    #[serde(rename = "primaryImage", default, deserialize_with = "empty_as_none")]
    pub primary_image: Option<String>,

    #[serde(rename = "objectDate", default, deserialize_with = "empty_as_none")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub culture: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub period: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub dynasty: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub dimensions: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub department: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub classification: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub country: Option<String>,

    #[serde(rename = "creditLine", default, deserialize_with = "empty_as_none")]
    pub credit_line: Option<String>,

    #[serde(rename = "objectURL", default, deserialize_with = "empty_as_none")]
    pub object_url: Option<String>,
}

impl ArtworkRecord {
    /// Every descriptive field as a labelled pair, with [`UNKNOWN`] for gaps.
    pub fn detail_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Title", field_or(&self.title, UNKNOWN)),
            ("Artist", field_or(&self.artist, UNKNOWN)),
            ("Artist Bio", field_or(&self.artist_bio, UNKNOWN)),
            ("Nationality", field_or(&self.artist_nationality, UNKNOWN)),
            ("Date", field_or(&self.date, UNKNOWN)),
            ("Medium", field_or(&self.medium, UNKNOWN)),
            ("Dimensions", field_or(&self.dimensions, UNKNOWN)),
            ("Culture", field_or(&self.culture, UNKNOWN)),
            ("Period", field_or(&self.period, UNKNOWN)),
            ("Dynasty", field_or(&self.dynasty, UNKNOWN)),
            ("Department", field_or(&self.department, UNKNOWN)),
            ("Classification", field_or(&self.classification, UNKNOWN)),
            ("Country", field_or(&self.country, UNKNOWN)),
            ("Credit Line", field_or(&self.credit_line, UNKNOWN)),
        ]
    }

    /// Flattened `Key: value` rendering used as LLM prompt context.
    pub fn detail_text(&self) -> String {
        self.detail_fields()
            .into_iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A record that has a usable primary image.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedArtwork {
    pub record: ArtworkRecord,
    pub image_url: String,
}

impl QualifiedArtwork {
    /// Promote a record, or hand it back if it has no image.
    pub fn from_record(record: ArtworkRecord) -> Result<Self, ArtworkRecord> {
        match record.primary_image.clone() {
            Some(image_url) => Ok(Self { record, image_url }),
            None => Err(record),
        }
    }

    pub fn object_id(&self) -> u64 {
        self.record.object_id
    }
}

/// Short description and price data attached to an artwork before posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    /// Plain-text narrative, roughly 400 characters at most
    pub short_description: String,

    /// Free-form currency range, e.g. "$8,000 - $12,000" (absent for cache
    /// entries that only store a point estimate)
    pub price_range: Option<String>,

    /// Single currency figure inside the range
    pub price: String,
}
