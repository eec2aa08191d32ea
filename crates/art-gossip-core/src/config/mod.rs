//! Configuration management for Art Gossip.
//!
//! Configuration is read once at startup from a TOML file (or defaults when
//! none exists), validated, and then passed by reference into every component.
//! Secrets are never stored in the file directly; they are `${ENV_VAR}`
//! references resolved by [`Config::resolve_secrets`].

mod secrets;
mod types;
mod validate;

pub use secrets::{resolve_env_var, Credentials, Secrets};
pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure for Art Gossip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Museum collection API
    pub collection: CollectionConfig,

    /// Enrichment backend selection
    pub enrichment: EnrichmentConfig,

    /// Text-generation provider
    pub llm: LlmConfig,

    /// Social platform account
    pub platform: PlatformConfig,

    /// Network limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.art-gossip.art-gossip/config.toml
    /// - Linux: ~/.config/art-gossip/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\art-gossip\config\config.toml
    ///
    /// Falls back to ~/.art-gossip/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "art-gossip", "art-gossip")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".art-gossip").join("config.toml")
            })
    }

    /// Get the resolved session file path (with ~ expansion).
    pub fn session_file(&self) -> PathBuf {
        let path_str = self.general.session_file.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Timeout applied to every non-LLM HTTP request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.limits.request_timeout_ms)
    }

    /// Timeout applied to each text-generation call.
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.limits.llm_timeout_ms)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
