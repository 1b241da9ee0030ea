//! Boatrace Harvest
//!
//! Command-line entry point for the race data harvester.

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boatrace_harvest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Harvest {
            start,
            end,
            venues,
            races,
            json,
        } => cli::run_harvest(cli.config, start, end, venues, races, json).await?,
        Commands::RetryPending { json } => cli::run_retry_pending(cli.config, json).await?,
        Commands::SeedVenues => cli::run_seed_venues(cli.config)?,
    };

    std::process::exit(code);
}
