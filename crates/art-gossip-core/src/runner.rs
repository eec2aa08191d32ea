//! One posting run: select → enrich → compose → log in → publish.

use crate::caption::{self, DEFAULT_ARTIST, DEFAULT_TITLE};
use crate::collection::{fetch_candidate, select_with_image, CollectionSource, MetMuseumClient};
use crate::config::{Config, EnrichmentMode, Secrets};
use crate::enrich::{CacheEnricher, EnrichmentProvider, GenerativeEnricher};
use crate::error::{self, ConfigError, PipelineError, PipelineResult};
use crate::http::build_client;
use crate::llm::OpenAiProvider;
use crate::platform::{InstagramClient, PlatformClient, SessionStore};
use crate::publish::Publisher;
use crate::session::SessionManager;
use crate::types::{field_or, QualifiedArtwork};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Default bound on random selection attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 25;

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compose the caption but skip login and upload
    pub dry_run: bool,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Posted {
        object_id: u64,
        title: String,
        artist: String,
        media_id: String,
    },
    /// The pre-selected artwork could not be posted (no image or unknown id)
    Skipped { object_id: u64 },
    DryRun { object_id: u64, caption: String },
}

enum Selection {
    Ready(QualifiedArtwork),
    Skipped(u64),
}

/// Wires the pipeline stages together for one run.
pub struct Runner {
    collection: Box<dyn CollectionSource>,
    enricher: Box<dyn EnrichmentProvider>,
    platform: Box<dyn PlatformClient>,
    session: SessionManager,
    publisher: Publisher,
    rng: StdRng,
    max_attempts: u32,
}

impl Runner {
    pub fn new(
        collection: Box<dyn CollectionSource>,
        enricher: Box<dyn EnrichmentProvider>,
        platform: Box<dyn PlatformClient>,
        session: SessionManager,
        publisher: Publisher,
    ) -> Self {
        Self {
            collection,
            enricher,
            platform,
            session,
            publisher,
            rng: StdRng::from_entropy(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Build the production wiring for `mode`.
    ///
    /// In cache mode the snapshot is downloaded here, so an empty cache fails
    /// before any artwork is fetched. Generative mode needs the LLM key in
    /// `secrets`; without it this is a configuration error.
    pub async fn from_config(
        config: &Config,
        secrets: &Secrets,
        mode: EnrichmentMode,
    ) -> error::Result<Self> {
        let http = build_client(config.request_timeout())?;
        let collection = MetMuseumClient::new(http.clone(), &config.collection.endpoint);

        let enricher: Box<dyn EnrichmentProvider> = match mode {
            EnrichmentMode::Cache => {
                Box::new(CacheEnricher::fetch(&http, &config.enrichment.cache.url).await?)
            }
            EnrichmentMode::Generative => {
                let api_key = secrets.llm_api_key.as_deref().ok_or_else(|| {
                    ConfigError::MissingSecret {
                        name: "llm.api_key",
                        hint: format!(
                            "Generative mode needs a text-generation key ({}).",
                            config.llm.api_key
                        ),
                    }
                })?;
                let provider = OpenAiProvider::new(
                    &config.llm.endpoint,
                    api_key,
                    &config.llm.model,
                    config.llm_timeout(),
                );
                Box::new(GenerativeEnricher::new(Box::new(provider), &config.llm))
            }
        };

        let platform = InstagramClient::new(&config.platform.api_base, config.request_timeout())
            .map_err(|e| PipelineError::HttpClient(e.to_string()))?;
        let session = SessionManager::new(
            SessionStore::new(config.session_file()),
            secrets.credentials.clone(),
        );

        Ok(Self::new(
            Box::new(collection),
            enricher,
            Box::new(platform),
            session,
            Publisher::new(http),
        )
        .with_max_attempts(config.collection.max_attempts))
    }

    /// Execute one run.
    pub async fn run(&mut self, options: RunOptions) -> PipelineResult<RunOutcome> {
        let artwork = match self.select().await? {
            Selection::Ready(artwork) => artwork,
            Selection::Skipped(object_id) => return Ok(RunOutcome::Skipped { object_id }),
        };
        let object_id = artwork.object_id();
        let title = field_or(&artwork.record.title, DEFAULT_TITLE).to_string();
        let artist = field_or(&artwork.record.artist, DEFAULT_ARTIST).to_string();
        tracing::info!("Selected artwork {object_id}: {title} by {artist}");

        let enrichment = self.enricher.enrich(&artwork.record).await?;
        let caption = caption::compose(&artwork.record, &enrichment);

        if options.dry_run {
            tracing::info!("Dry run, not posting artwork {object_id}");
            return Ok(RunOutcome::DryRun { object_id, caption });
        }

        self.session.establish(self.platform.as_mut()).await?;
        let posted = self
            .publisher
            .publish(self.platform.as_mut(), &artwork, &caption)
            .await?;

        tracing::info!("Posted: {title} by {artist} (ID: {object_id})");
        Ok(RunOutcome::Posted {
            object_id,
            title,
            artist,
            media_id: posted.media_id,
        })
    }

    async fn select(&mut self) -> PipelineResult<Selection> {
        match self.enricher.candidate_ids() {
            Some(ids) => {
                let id = *ids
                    .choose(&mut self.rng)
                    .ok_or(PipelineError::NoCachedArtworks)?;
                tracing::debug!(
                    "Picked cached artwork {id} from {} candidates ({})",
                    ids.len(),
                    self.enricher.name()
                );
                match fetch_candidate(self.collection.as_ref(), id).await? {
                    Some(artwork) => Ok(Selection::Ready(artwork)),
                    None => {
                        tracing::info!("No image for ID {id}, skipping.");
                        Ok(Selection::Skipped(id))
                    }
                }
            }
            None => {
                tracing::debug!("Selecting from {}", self.collection.name());
                select_with_image(self.collection.as_ref(), &mut self.rng, self.max_attempts)
                    .await
                    .map(Selection::Ready)
            }
        }
    }
}
