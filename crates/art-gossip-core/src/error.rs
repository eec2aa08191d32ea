//! Error types for the Art Gossip posting pipeline.
//!
//! Errors are organized by stage so a failed run says where it stopped
//! (collection fetch, cache lookup, generation, login, upload) and carries
//! the ids, URLs and status codes needed to act on it.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Art Gossip operations.
#[derive(Error, Debug)]
pub enum ArtGossipError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A required secret did not resolve (unset env var or empty value)
    #[error("Missing required secret `{name}`. {hint}")]
    MissingSecret { name: &'static str, hint: String },
}

/// Pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Collection or cache endpoint unreachable, non-success, or malformed
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// The collection has no object with this id
    #[error("Artwork {id} not found in collection")]
    ArtworkNotFound { id: u64 },

    /// The cache store returned no usable entries
    #[error("No cached artworks found in cache store")]
    NoCachedArtworks,

    /// The cache store has no entry for this artwork
    #[error("No cached data for artwork {id}")]
    NotCached { id: u64 },

    /// Random selection never hit a record with an image
    #[error("No artwork with an image found after {attempts} attempts")]
    NoImageFound { attempts: u32 },

    /// Raw LLM provider failure (before it is attributed to a stage)
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// Text generation failed for one of the enrichment stages
    #[error("Generation failed ({stage}): {message}")]
    Generation {
        stage: &'static str,
        message: String,
        status_code: Option<u16>,
    },

    /// Every session and password path failed
    #[error("Login failed.")]
    Login,

    /// Image download failed
    #[error("Download failed for {url}: {message}")]
    Download { url: String, message: String },

    /// Platform rejected or failed the upload
    #[error("Upload failed for {path}: {message}")]
    Upload { path: PathBuf, message: String },

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl PipelineError {
    /// Attribute a raw provider error to an enrichment stage.
    ///
    /// Non-LLM errors pass through unchanged.
    pub fn in_stage(self, stage: &'static str) -> Self {
        match self {
            PipelineError::Llm {
                message,
                status_code,
            } => PipelineError::Generation {
                stage,
                message,
                status_code,
            },
            other => other,
        }
    }
}

/// Convenience type alias for Art Gossip results.
pub type Result<T> = std::result::Result<T, ArtGossipError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_stage_converts_llm_error() {
        let err = PipelineError::Llm {
            message: "HTTP 500".to_string(),
            status_code: Some(500),
        }
        .in_stage("price range");

        match err {
            PipelineError::Generation {
                stage, status_code, ..
            } => {
                assert_eq!(stage, "price range");
                assert_eq!(status_code, Some(500));
            }
            other => panic!("expected Generation, got {other:?}"),
        }
    }

    #[test]
    fn test_in_stage_passes_other_errors_through() {
        let err = PipelineError::NoCachedArtworks.in_stage("description");
        assert!(matches!(err, PipelineError::NoCachedArtworks));
    }

    #[test]
    fn test_top_level_error_wraps_stage() {
        let err: ArtGossipError = ConfigError::MissingSecret {
            name: "llm.api_key",
            hint: "Set OPENAI_API_KEY.".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required secret `llm.api_key`. Set OPENAI_API_KEY."
        );

        let err: ArtGossipError = PipelineError::NoCachedArtworks.into();
        assert!(matches!(
            err,
            ArtGossipError::Pipeline(PipelineError::NoCachedArtworks)
        ));
    }

    #[test]
    fn test_login_error_message() {
        assert_eq!(PipelineError::Login.to_string(), "Login failed.");
    }
}
