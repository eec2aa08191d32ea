//! The `art-gossip post` command (also the default when no command is given).

use art_gossip_core::{EnrichmentMode, RunOptions, RunOutcome, Runner};
use clap::{Args, ValueEnum};
use std::path::Path;

/// Arguments for the `post` command.
#[derive(Args, Debug, Default)]
pub struct PostArgs {
    /// Compose the caption and print it without logging in or posting
    #[arg(long)]
    pub dry_run: bool,

    /// Enrichment backend for this run (overrides `enrichment.mode`)
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,
}

/// Enrichment backends selectable from the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Mode {
    /// Pre-built description and price snapshot
    Cache,
    /// Three text-generation calls per artwork
    Generative,
}

impl From<Mode> for EnrichmentMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Cache => EnrichmentMode::Cache,
            Mode::Generative => EnrichmentMode::Generative,
        }
    }
}

/// Execute the post command.
pub async fn execute(args: PostArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let mode = args
        .mode
        .map(EnrichmentMode::from)
        .unwrap_or(config.enrichment.mode);

    // Fails on missing credentials before anything touches the network
    let secrets = config.resolve_secrets(mode)?;
    tracing::info!("Starting run in {mode} mode");

    let mut runner = Runner::from_config(&config, &secrets, mode).await?;
    let outcome = runner
        .run(RunOptions {
            dry_run: args.dry_run,
        })
        .await?;

    match outcome {
        RunOutcome::Posted { media_id, .. } => {
            tracing::debug!("Platform media id: {media_id}");
        }
        RunOutcome::Skipped { object_id } => {
            tracing::info!("Nothing posted this run (artwork {object_id} unusable)");
        }
        RunOutcome::DryRun { caption, .. } => {
            println!("{caption}");
        }
    }

    Ok(())
}
