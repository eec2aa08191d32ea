//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Where the platform session blob is persisted between runs
    pub session_file: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            session_file: PathBuf::from("session.json"),
        }
    }
}

/// Museum collection API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Base URL of the collection API (`/objects` and `/objects/{id}` are appended)
    pub endpoint: String,

    /// Maximum random ids tried before giving up on finding one with an image
    pub max_attempts: u32,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://collectionapi.metmuseum.org/public/collection/v1".to_string(),
            max_attempts: 25,
        }
    }
}

/// Which enrichment backend supplies descriptions and prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentMode {
    /// Read pre-generated entries from the cache store
    #[default]
    Cache,
    /// Generate entries on the fly through the LLM
    Generative,
}

impl std::fmt::Display for EnrichmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichmentMode::Cache => write!(f, "cache"),
            EnrichmentMode::Generative => write!(f, "generative"),
        }
    }
}

/// Enrichment settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Backend selection
    pub mode: EnrichmentMode,

    /// Cache store settings (cache mode)
    pub cache: CacheConfig,
}

/// Cache store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// REST URL of the artworks collection (`.json` is appended)
    pub url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "https://art-gossip-cache-default-rtdb.firebaseio.com/artworks".to_string(),
        }
    }
}

/// Text-generation settings (generative mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Maximum tokens per completion
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

/// Social platform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Base URL of the platform's private API host
    pub api_base: String,

    /// Account username (supports ${ENV_VAR} syntax)
    pub username: String,

    /// Account password (supports ${ENV_VAR} syntax)
    pub password: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_base: "https://i.instagram.com".to_string(),
            username: "${IG_USERNAME}".to_string(),
            password: "${IG_PASSWORD}".to_string(),
        }
    }
}

/// Network limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Timeout for collection, cache, image and platform requests
    pub request_timeout_ms: u64,

    /// Timeout for each text-generation call
    pub llm_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            llm_timeout_ms: 60_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
