//! Art Gossip Core - artwork selection, enrichment and posting.
//!
//! One run picks a random artwork from The Met collection, enriches it with a
//! short description and a price estimate, composes a caption, establishes
//! an Instagram session and posts the image.
//!
//! # Architecture
//!
//! ```text
//! CollectionSource → EnrichmentProvider → caption::compose → SessionManager → Publisher
//! ```
//!
//! Enrichment comes either from a pre-built cache snapshot or from an
//! OpenAI-compatible text-generation API. The session blob is the only state
//! that survives between runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use art_gossip_core::{Config, RunOptions, Runner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let mode = config.enrichment.mode;
//!     let secrets = config.resolve_secrets(mode)?;
//!
//!     let mut runner = Runner::from_config(&config, &secrets, mode).await?;
//!     let outcome = runner.run(RunOptions::default()).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod caption;
pub mod collection;
pub mod config;
pub mod enrich;
pub mod error;
pub mod http;
pub mod llm;
pub mod platform;
pub mod publish;
pub mod runner;
pub mod session;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, EnrichmentMode, Secrets};
pub use error::{ArtGossipError, ConfigError, PipelineError, PipelineResult, Result};
pub use platform::{InstagramClient, PlatformClient, PlatformError, PostedMedia};
pub use publish::Publisher;
pub use runner::{RunOptions, RunOutcome, Runner};
pub use session::{LoginMethod, SessionManager};
pub use types::{ArtworkRecord, EnrichmentResult, QualifiedArtwork};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
