//! Image download and upload.

use crate::error::{PipelineError, PipelineResult};
use crate::http::ensure_success;
use crate::platform::{PlatformClient, PostedMedia};
use crate::types::QualifiedArtwork;
use futures_util::StreamExt;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// Downloads an artwork image into a scoped temp file and posts it.
pub struct Publisher {
    http: reqwest::Client,
    temp_dir: Option<PathBuf>,
}

impl Publisher {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            temp_dir: None,
        }
    }

    /// Place temp images in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Post `artwork` with `caption` through an authenticated client.
    ///
    /// The temp file is removed when this returns, whatever the outcome.
    pub async fn publish<C: PlatformClient + ?Sized>(
        &self,
        client: &mut C,
        artwork: &QualifiedArtwork,
        caption: &str,
    ) -> PipelineResult<PostedMedia> {
        let image = self.download(&artwork.image_url).await?;
        tracing::debug!("Image saved to {}", image.path().display());

        client
            .upload_photo(image.path(), caption)
            .await
            .map_err(|e| PipelineError::Upload {
                path: image.path().to_path_buf(),
                message: e.to_string(),
            })
    }

    async fn download(&self, url: &str) -> PipelineResult<NamedTempFile> {
        let download_err = |message: String| PipelineError::Download {
            url: url.to_string(),
            message,
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix("art-gossip-").suffix(".jpg");
        let temp = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| download_err(format!("cannot create temp file: {e}")))?;

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| download_err(e.to_string()))?;
        let resp = ensure_success(resp, url).await.map_err(|e| match e {
            PipelineError::Fetch { message, .. } => download_err(message),
            other => other,
        })?;

        let mut file = tokio::fs::File::create(temp.path())
            .await
            .map_err(|e| download_err(e.to_string()))?;
        let mut stream = resp.bytes_stream();
        let mut written = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_err(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| download_err(e.to_string()))?;
            written += chunk.len();
        }
        file.flush().await.map_err(|e| download_err(e.to_string()))?;

        if written == 0 {
            return Err(download_err("empty image body".to_string()));
        }
        tracing::debug!("Downloaded {written} bytes from {url}");
        Ok(temp)
    }
}
