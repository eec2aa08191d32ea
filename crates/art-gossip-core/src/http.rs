//! Shared reqwest client construction.

use crate::error::{PipelineError, PipelineResult};
use std::time::Duration;

/// User agent sent to the collection, cache and image hosts.
pub const USER_AGENT: &str = concat!("art-gossip/", env!("CARGO_PKG_VERSION"));

/// Build an HTTP client with a fixed per-request timeout.
pub fn build_client(timeout: Duration) -> PipelineResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| PipelineError::HttpClient(e.to_string()))
}

/// Turn a non-success response into a `Fetch` error carrying the body.
pub(crate) async fn ensure_success(
    resp: reqwest::Response,
    url: &str,
) -> PipelineResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    Err(PipelineError::Fetch {
        url: url.to_string(),
        message: format!("HTTP {status}: {text}"),
    })
}
