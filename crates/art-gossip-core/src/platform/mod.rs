//! Social platform access.
//!
//! [`PlatformClient`] is the capability set the session manager and the
//! publisher rely on: swap settings in and out, log in, probe the session,
//! upload a photo. [`InstagramClient`] implements it over the mobile private
//! API; tests substitute in-memory fakes.

mod instagram;
mod settings;
mod store;

pub use instagram::InstagramClient;
pub use settings::{DeviceIds, SessionSettings};
pub use store::{SessionStore, SessionStoreError};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors surfaced by a platform client.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The platform no longer accepts the current session
    #[error("login required")]
    LoginRequired,

    /// Username or password rejected
    #[error("bad credentials: {0}")]
    BadCredentials(String),

    /// Platform demands an interactive checkpoint (2FA, challenge)
    #[error("checkpoint required: {0}")]
    Checkpoint(String),

    /// Non-success response not covered above
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Network-level failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Response did not have the expected shape
    #[error("unexpected response: {0}")]
    Protocol(String),

    /// Local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identifier of a published post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMedia {
    pub media_id: String,
    /// Short code used in public URLs, when the platform reports it
    pub code: Option<String>,
}

/// Capability interface over an authenticated social platform client.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Snapshot of the current session settings (for persistence).
    fn settings(&self) -> SessionSettings;

    /// Replace the session settings wholesale.
    fn set_settings(&mut self, settings: SessionSettings);

    /// Replace only the device identifiers.
    fn set_device_ids(&mut self, ids: DeviceIds);

    /// Authenticate. Reuses stored authorization when present.
    async fn login(&mut self, username: &str, password: &str) -> Result<(), PlatformError>;

    /// Innocuous authenticated request used to validate the session.
    async fn timeline_feed(&mut self) -> Result<(), PlatformError>;

    /// Publish a photo with a caption.
    async fn upload_photo(
        &mut self,
        path: &Path,
        caption: &str,
    ) -> Result<PostedMedia, PlatformError>;
}
