//! Boat race data harvester
//!
//! Crawls entry lists, pre-race information, results and payouts from
//! boatrace.jp and stores them in SQLite, one race aggregate at a time.

pub mod assembler;
pub mod config;
pub mod crawler;
pub mod enumerator;
pub mod error;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod retry;
pub mod selectors;
pub mod storage;

#[cfg(test)]
mod fixtures;

pub use config::AppConfig;
pub use enumerator::TargetFilter;
pub use orchestrator::{Harvester, HarvestRequest, RunSummary};
pub use storage::RaceRepository;
