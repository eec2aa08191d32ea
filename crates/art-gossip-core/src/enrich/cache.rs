//! Cache-backed enrichment from a Firebase Realtime Database snapshot.
//!
//! The store is read once with `GET {url}.json`. Firebase answers `null` for
//! an empty node and may render numeric keys as a sparse array, so both
//! shapes are accepted alongside the usual object map.

use super::EnrichmentProvider;
use crate::error::{PipelineError, PipelineResult};
use crate::http::ensure_success;
use crate::types::{ArtworkRecord, EnrichmentResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One pre-generated cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedArtwork {
    #[serde(rename = "shortDesc")]
    pub short_desc: String,

    #[serde(rename = "rawSingle")]
    pub raw_single: String,

    #[serde(rename = "rawRange", default, skip_serializing_if = "Option::is_none")]
    pub raw_range: Option<String>,
}

/// Enrichment served from an in-memory cache snapshot.
#[derive(Debug)]
pub struct CacheEnricher {
    entries: BTreeMap<u64, CachedArtwork>,
}

impl CacheEnricher {
    /// Download the snapshot from the cache store.
    ///
    /// Fails with `NoCachedArtworks` when the store holds no usable entry.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> PipelineResult<Self> {
        let url = format!("{}.json", url.trim_end_matches('/').trim_end_matches(".json"));
        let resp = client
            .get(&url)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch {
                url: url.clone(),
                message: format!("request failed: {e}"),
            })?;
        let resp = ensure_success(resp, &url).await?;

        let snapshot: Value = resp.json().await.map_err(|e| PipelineError::Fetch {
            url: url.clone(),
            message: format!("malformed cache snapshot: {e}"),
        })?;

        let enricher = Self::from_entries(parse_snapshot(snapshot))?;
        tracing::info!("Loaded {} cached artworks", enricher.len());
        Ok(enricher)
    }

    /// Build from already-parsed entries.
    pub fn from_entries(entries: BTreeMap<u64, CachedArtwork>) -> PipelineResult<Self> {
        if entries.is_empty() {
            return Err(PipelineError::NoCachedArtworks);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&CachedArtwork> {
        self.entries.get(&id)
    }
}

fn parse_snapshot(snapshot: Value) -> BTreeMap<u64, CachedArtwork> {
    let raw: Vec<(String, Value)> = match snapshot {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Value::Null => Vec::new(),
        other => {
            tracing::warn!("Unexpected cache snapshot shape: {other}");
            Vec::new()
        }
    };

    let mut entries = BTreeMap::new();
    for (key, value) in raw {
        let Ok(id) = key.parse::<u64>() else {
            tracing::warn!("Skipping cache entry with non-numeric id {key:?}");
            continue;
        };
        match serde_json::from_value::<CachedArtwork>(value) {
            Ok(entry) => {
                entries.insert(id, entry);
            }
            Err(e) => tracing::warn!("Skipping malformed cache entry {id}: {e}"),
        }
    }
    entries
}

#[async_trait]
impl EnrichmentProvider for CacheEnricher {
    fn name(&self) -> &str {
        "cache"
    }

    fn candidate_ids(&self) -> Option<Vec<u64>> {
        Some(self.entries.keys().copied().collect())
    }

    async fn enrich(&self, record: &ArtworkRecord) -> Result<EnrichmentResult, PipelineError> {
        let entry = self
            .entries
            .get(&record.object_id)
            .ok_or(PipelineError::NotCached {
                id: record.object_id,
            })?;

        Ok(EnrichmentResult {
            short_description: entry.short_desc.clone(),
            price_range: entry.raw_range.clone(),
            price: entry.raw_single.clone(),
        })
    }
}
