//! CLI commands for boatrace-harvest.
//!
//! Supports batch harvesting, the pending-phase retry pass and venue seeding.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use boatrace_harvest::{AppConfig, HarvestRequest, Harvester, RaceRepository, RunSummary, TargetFilter};

#[derive(Parser)]
#[command(name = "boatrace-harvest")]
#[command(version, about = "Harvest boat race entry lists, results and payouts into SQLite", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to boatrace.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Harvest every race in a date range
    Harvest {
        /// First date (YYYY-MM-DD)
        #[arg(short, long)]
        start: NaiveDate,

        /// Last date, inclusive (defaults to the start date)
        #[arg(short, long)]
        end: Option<NaiveDate>,

        /// Venue codes to include (e.g. 01,12)
        #[arg(short, long, value_delimiter = ',')]
        venues: Vec<String>,

        /// Race numbers to include (e.g. 1,6,12)
        #[arg(short, long, value_delimiter = ',')]
        races: Vec<u8>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-run phases left pending by earlier runs
    RetryPending {
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Insert the venue reference data into the database
    SeedVenues,
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = AppConfig::load_from(path).context("Failed to load configuration")?;
    info!("Database: {}", config.storage.db_path.display());
    Ok(config)
}

fn open_harvester(config: &AppConfig) -> Result<Harvester> {
    let repository = RaceRepository::new(&config.storage.db_path)?;
    let harvester = Harvester::new(config, repository)?;

    // Stop between targets on Ctrl-C
    let token = harvester.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current target");
            token.cancel();
        }
    });

    Ok(harvester)
}

fn log_store_totals(repository: &RaceRepository) -> Result<()> {
    info!(
        "Store holds {} races, {} entries, {} payouts, {} players",
        repository.get_race_count()?,
        repository.get_entry_count()?,
        repository.get_payout_count()?,
        repository.get_player_count()?
    );
    Ok(())
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("Done:    {} ({} with pending phases)", summary.done, summary.partial);
    println!("Failed:  {}", summary.failed_total());
    for (class, count) in &summary.failed {
        println!("  {:<28} {}", class.to_string(), count);
    }
    if !summary.unavailable_dates.is_empty() {
        let dates: Vec<String> = summary.unavailable_dates.iter().map(|d| d.to_string()).collect();
        println!("Schedule unavailable: {}", dates.join(", "));
    }
    if summary.schema_alerts > 0 {
        println!("Selector map alerts: {}", summary.schema_alerts);
    }
    println!("Warnings: {}", summary.warnings);
    if summary.cancelled {
        println!("Cancelled before completion");
    }
    Ok(())
}

/// Harvest a date range; returns the process exit code
pub async fn run_harvest(
    config_path: Option<PathBuf>,
    start: NaiveDate,
    end: Option<NaiveDate>,
    venues: Vec<String>,
    races: Vec<u8>,
    json: bool,
) -> Result<i32> {
    let end = end.unwrap_or(start);
    if end < start {
        bail!("End date {} is before start date {}", end, start);
    }

    let config = load_config(config_path.as_deref())?;
    let mut harvester = open_harvester(&config)?;

    let request = HarvestRequest {
        start,
        end,
        filter: TargetFilter {
            venues: (!venues.is_empty()).then(|| venues.into_iter().collect()),
            races: (!races.is_empty()).then(|| races.into_iter().collect()),
        },
    };

    let summary = harvester.run(&request).await;
    print_summary(&summary, json)?;
    log_store_totals(harvester.repository())?;
    Ok(summary.exit_code())
}

/// Retry pending phases; returns the process exit code
pub async fn run_retry_pending(config_path: Option<PathBuf>, json: bool) -> Result<i32> {
    let config = load_config(config_path.as_deref())?;
    let mut harvester = open_harvester(&config)?;

    let summary = harvester.retry_pending().await?;
    print_summary(&summary, json)?;
    log_store_totals(harvester.repository())?;
    Ok(summary.exit_code())
}

pub fn run_seed_venues(config_path: Option<PathBuf>) -> Result<i32> {
    let config = load_config(config_path.as_deref())?;
    let repository = RaceRepository::new(&config.storage.db_path)?;
    let inserted = repository.seed_venues()?;
    println!("Inserted {} venues", inserted);
    Ok(0)
}
