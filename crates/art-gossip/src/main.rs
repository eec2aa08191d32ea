//! Art Gossip CLI - posts a museum artwork with a gossipy caption.
//!
//! Each invocation picks one artwork from The Met collection, enriches it
//! with a short description and a price estimate, and posts it to Instagram.
//! Schedule it externally (cron, systemd timer) for a recurring feed.
//!
//! # Usage
//!
//! ```bash
//! # Post one artwork using the configured enrichment mode
//! art-gossip
//!
//! # Generate the caption with the LLM and print it without posting
//! art-gossip post --mode generative --dry-run
//!
//! # View configuration
//! art-gossip config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Art Gossip - posts a museum artwork with a caption and price estimate.
#[derive(Parser, Debug)]
#[command(name = "art-gossip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "ART_GOSSIP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Select, enrich and post one artwork (default)
    Post(cli::post::PostArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    // Logging isn't up yet, so config problems go to stderr directly.
    // The command handlers reload and fail properly.
    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default logging settings. \
                 Check your config file with `art-gossip config path`."
            );
            art_gossip_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to load .env file: {e}"),
    }
    tracing::debug!("Art Gossip v{}", art_gossip_core::VERSION);

    let config_path = cli.config.as_deref();
    match cli.command.unwrap_or(Commands::Post(Default::default())) {
        Commands::Post(args) => cli::post::execute(args, config_path).await,
        Commands::Config(args) => cli::config::execute(args, config_path).await,
    }
}
