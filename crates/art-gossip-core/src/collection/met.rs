//! The Met Collection API (public, unauthenticated).

use super::CollectionSource;
use crate::error::PipelineError;
use crate::http::ensure_success;
use crate::types::ArtworkRecord;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

/// Client for `GET /objects` and `GET /objects/{id}`.
pub struct MetMuseumClient {
    client: reqwest::Client,
    endpoint: String,
}

impl MetMuseumClient {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ObjectListing {
    #[serde(rename = "objectIDs", default)]
    object_ids: Option<Vec<u64>>,
}

#[async_trait]
impl CollectionSource for MetMuseumClient {
    fn name(&self) -> &str {
        "metmuseum"
    }

    async fn fetch_all_ids(&self) -> Result<Vec<u64>, PipelineError> {
        let url = format!("{}/objects", self.endpoint);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch {
                url: url.clone(),
                message: format!("request failed: {e}"),
            })?;
        let resp = ensure_success(resp, &url).await?;

        let listing: ObjectListing = resp.json().await.map_err(|e| PipelineError::Fetch {
            url: url.clone(),
            message: format!("malformed object listing: {e}"),
        })?;

        let ids = listing.object_ids.unwrap_or_default();
        tracing::debug!("Collection lists {} object ids", ids.len());
        Ok(ids)
    }

    async fn fetch_record(&self, id: u64) -> Result<ArtworkRecord, PipelineError> {
        let url = format!("{}/objects/{id}", self.endpoint);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch {
                url: url.clone(),
                message: format!("request failed: {e}"),
            })?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(PipelineError::ArtworkNotFound { id });
        }
        let resp = ensure_success(resp, &url).await?;

        resp.json().await.map_err(|e| PipelineError::Fetch {
            url,
            message: format!("malformed object record: {e}"),
        })
    }
}
