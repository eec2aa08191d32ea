//! Command handlers.

pub mod config;
pub mod post;

use art_gossip_core::{Config, ConfigError};
use std::path::Path;

/// Load the config from an explicit path, or the default location.
///
/// An explicit path must exist; the default location falls back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
