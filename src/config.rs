//! Configuration for the harvester.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::normalize::season::SeasonConvention;
use crate::retry::RetryConfig;

/// Crawl policy: pacing, retry and identification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum gap between any two requests
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    /// Random extra delay added on top of the minimum interval
    #[serde(default)]
    pub jitter_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default = "default_blocked_backoff_multiplier")]
    pub blocked_backoff_multiplier: f64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_base_url() -> String {
    "https://www.boatrace.jp/owpc/pc/race".to_string()
}

fn default_user_agent() -> String {
    concat!("boatrace-harvest/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_min_interval_ms() -> u64 {
    1000
}

fn default_requests_per_minute() -> u32 {
    60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_blocked_backoff_multiplier() -> f64 {
    4.0
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            min_interval_ms: default_min_interval_ms(),
            requests_per_minute: default_requests_per_minute(),
            jitter_ms: 0,
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            blocked_backoff_multiplier: default_blocked_backoff_multiplier(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl CrawlConfig {
    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.backoff_base_ms),
            max_delay: Duration::from_millis(self.max_backoff_ms),
            multiplier: self.backoff_multiplier,
            steep_multiplier: self.blocked_backoff_multiplier,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data/boat_data.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Selector map location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorsConfig {
    /// Path to a selector map JSON file; the built-in map is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Season key convention
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonConfig {
    #[serde(default)]
    pub convention: SeasonConvention,
}

/// Batch defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Canonical race-number range, bounded further by the schedule index
    #[serde(default = "default_race_numbers")]
    pub race_numbers: Vec<u8>,
}

fn default_race_numbers() -> Vec<u8> {
    (1..=12).collect()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            race_numbers: default_race_numbers(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub selectors: SelectorsConfig,
    #[serde(default)]
    pub season: SeasonConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl AppConfig {
    /// Load configuration from defaults, `boatrace.toml` and environment
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of `boatrace.toml` when given
    pub fn load_from(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name("boatrace").required(false),
        };

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(file)
            // Override with environment variables (BOATRACE_CRAWL__MIN_INTERVAL_MS, etc.)
            .add_source(
                config::Environment::with_prefix("BOATRACE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
