//! Batch orchestration: drives every target through fetch, extraction,
//! cleaning and persistence, and tallies the outcome per failure class.

use anyhow::Result;
use chrono::NaiveDate;
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::assembler::Assembler;
use crate::config::AppConfig;
use crate::crawler::{Fetcher, Locator, RateLimiter};
use crate::enumerator::{date_range, TargetEnumerator, TargetFilter};
use crate::error::{ExtractError, FailureClass, FetchError, HarvestError};
use crate::model::{Phase, RaceKey};
use crate::normalize::season::SeasonConvention;
use crate::normalize::{self, Cleaner};
use crate::selectors::{ExtractContext, Extractor};
use crate::storage::RaceRepository;

/// Date range plus optional venue and race filters
#[derive(Debug, Clone)]
pub struct HarvestRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub filter: TargetFilter,
}

/// Per-target lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetState {
    Pending,
    Fetching,
    Extracting,
    Cleaning,
    Persisting,
    Done,
    Failed,
}

/// Final state of one target
#[derive(Debug, Clone, Serialize)]
pub struct TargetOutcome {
    pub key: RaceKey,
    pub state: TargetState,
    /// Stage the target was in when it failed
    pub failed_at: Option<TargetState>,
    pub class: Option<FailureClass>,
    /// Phases left for a later retry pass
    pub pending: BTreeSet<Phase>,
    pub schema_alert: bool,
    pub warnings: usize,
}

impl TargetOutcome {
    fn new(key: RaceKey) -> Self {
        Self {
            key,
            state: TargetState::Pending,
            failed_at: None,
            class: None,
            pending: BTreeSet::new(),
            schema_alert: false,
            warnings: 0,
        }
    }

    fn advance(&mut self, next: TargetState) {
        debug!("{}: {:?} -> {:?}", self.key, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, class: FailureClass) {
        self.failed_at = Some(self.state);
        self.class = Some(class);
        self.advance(TargetState::Failed);
    }
}

/// Run-level tallies for operator triage
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub done: usize,
    pub failed: BTreeMap<FailureClass, usize>,
    /// Targets persisted with at least one phase still pending
    pub partial: usize,
    pub pending_phases: usize,
    pub unavailable_dates: Vec<NaiveDate>,
    pub schema_alerts: usize,
    pub warnings: usize,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &TargetOutcome) {
        match (outcome.state, outcome.class) {
            (TargetState::Done, _) => {
                self.done += 1;
                if !outcome.pending.is_empty() {
                    self.partial += 1;
                    self.pending_phases += outcome.pending.len();
                }
            }
            (_, Some(class)) => *self.failed.entry(class).or_default() += 1,
            (state, None) => warn!("{} ended in {:?} without a failure class", outcome.key, state),
        }
        if outcome.schema_alert {
            self.schema_alerts += 1;
        }
        self.warnings += outcome.warnings;
    }

    pub fn failed_total(&self) -> usize {
        self.failed.values().sum()
    }

    /// Zero only when every target reached DONE
    pub fn exit_code(&self) -> i32 {
        if self.failed_total() > 0 || !self.unavailable_dates.is_empty() || self.cancelled {
            1
        } else {
            0
        }
    }

    pub fn log(&self) {
        info!(
            "Run finished: {} done ({} partial), {} failed, {} unavailable dates, {} schema alerts, {} warnings",
            self.done,
            self.partial,
            self.failed_total(),
            self.unavailable_dates.len(),
            self.schema_alerts,
            self.warnings
        );
        for (class, count) in &self.failed {
            info!("  {}: {}", class, count);
        }
        if self.cancelled {
            warn!("Run was cancelled before all targets were processed");
        }
    }
}

/// Outcome of one phase before assembly
enum PhaseResult {
    Fragment(normalize::Fragment),
    Failed { stage: TargetState, err: HarvestError },
}

/// Sequential batch driver sharing one fetcher and rate limiter
pub struct Harvester {
    fetcher: Fetcher,
    limiter: RateLimiter,
    extractor: Extractor,
    locator: Locator,
    repository: RaceRepository,
    convention: SeasonConvention,
    race_numbers: Vec<u8>,
    cancel: CancellationToken,
}

impl Harvester {
    pub fn new(config: &AppConfig, repository: RaceRepository) -> Result<Self> {
        let extractor = Extractor::load(config.selectors.path.as_deref())?;
        Ok(Self::with_parts(
            Fetcher::new(&config.crawl)?,
            RateLimiter::from_config(&config.crawl),
            extractor,
            Locator::new(config.crawl.base_url.clone()),
            repository,
            config.season.convention,
            config.batch.race_numbers.clone(),
        ))
    }

    pub fn with_parts(
        fetcher: Fetcher,
        limiter: RateLimiter,
        extractor: Extractor,
        locator: Locator,
        repository: RaceRepository,
        convention: SeasonConvention,
        race_numbers: Vec<u8>,
    ) -> Self {
        Self {
            fetcher,
            limiter,
            extractor,
            locator,
            repository,
            convention,
            race_numbers,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the run between targets
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn repository(&self) -> &RaceRepository {
        &self.repository
    }

    /// Harvest every target in the request; a failed target never stops the run
    pub async fn run(&mut self, request: &HarvestRequest) -> RunSummary {
        let mut summary = RunSummary::default();
        info!(
            "Harvesting {} to {} with selector map {}",
            request.start,
            request.end,
            self.extractor.version()
        );

        'dates: for date in date_range(request.start, request.end) {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let targets = TargetEnumerator::new(
                &self.fetcher,
                &self.limiter,
                &self.extractor,
                &self.locator,
                &self.race_numbers,
            )
            .targets_for(date, &request.filter)
            .await;

            let targets = match targets {
                Ok(targets) => targets,
                Err(e) => {
                    warn!("Skipping {}: {}", date, e);
                    if e.class() == FailureClass::ExtractionSchemaMismatch {
                        summary.schema_alerts += 1;
                    }
                    summary.unavailable_dates.push(date);
                    continue;
                }
            };
            info!("{}: {} targets", date, targets.len());

            for key in targets {
                if self.cancel.is_cancelled() {
                    summary.cancelled = true;
                    break 'dates;
                }
                let outcome = self.harvest_target(&key, &Phase::ALL).await;
                summary.record(&outcome);
            }
        }

        summary.log();
        summary
    }

    /// Re-run only the phases recorded as pending by earlier runs
    pub async fn retry_pending(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let targets = self.repository.pending_phases()?;
        info!("Retrying {} races with pending phases", targets.len());

        for target in targets {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            let phases: Vec<Phase> = target.phases.into_iter().collect();
            let outcome = self.harvest_target(&target.key, &phases).await;
            summary.record(&outcome);
        }

        summary.log();
        Ok(summary)
    }

    /// Drive one race through its lifecycle for the given phases
    pub async fn harvest_target(&mut self, key: &RaceKey, phases: &[Phase]) -> TargetOutcome {
        let mut outcome = TargetOutcome::new(key.clone());

        outcome.advance(TargetState::Fetching);
        let urls: Vec<String> = phases
            .iter()
            .map(|p| self.locator.race_page(p.page(), key))
            .collect();
        let bodies = join_all(urls.iter().map(|url| self.fetcher.fetch(url, &self.limiter))).await;

        outcome.advance(TargetState::Extracting);
        let mut cleaner = Cleaner::new();
        let mut assembler = Assembler::new(key.clone(), self.convention);
        let mut failures = Vec::new();

        for (phase, body) in phases.iter().copied().zip(bodies) {
            match self.process_phase(phase, key, body, &mut cleaner) {
                PhaseResult::Fragment(fragment) => assembler.add(fragment),
                PhaseResult::Failed { stage, err } => {
                    let class = err.class();
                    if class == FailureClass::ExtractionSchemaMismatch {
                        outcome.schema_alert = true;
                        error!(
                            alert = "selector_map_stale",
                            "{} {} ({}): {}", key, phase, class, err
                        );
                    } else {
                        warn!("{} {} failed at {:?} ({}): {}", key, phase, stage, class, err);
                    }
                    assembler.mark_pending(phase);
                    failures.push((stage, class));
                }
            }
        }
        outcome.warnings = cleaner.warnings().len();

        if !assembler.has_fragments() {
            // Nothing to persist; report the most informative failure
            let (stage, class) = failures
                .iter()
                .copied()
                .find(|(_, c)| *c == FailureClass::ExtractionSchemaMismatch)
                .or_else(|| failures.first().copied())
                .unwrap_or((TargetState::Fetching, FailureClass::FetchPermanent));
            outcome.state = stage;
            outcome.fail(class);
            return outcome;
        }

        outcome.advance(TargetState::Cleaning);
        let aggregate = assembler.finish();

        outcome.advance(TargetState::Persisting);
        match self.repository.save_aggregate(&aggregate) {
            Ok(report) => {
                outcome.pending = aggregate.pending.union(&report.deferred).copied().collect();
                outcome.advance(TargetState::Done);
                info!(
                    "{} done: {} entries, {} payouts, pending [{}]",
                    key,
                    report.entries_written,
                    report.payouts_inserted,
                    outcome
                        .pending
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            Err(e) => {
                let err = HarvestError::Persistence(e);
                error!("{} failed at {:?} ({}): {}", key, outcome.state, err.class(), err);
                outcome.fail(err.class());
            }
        }

        outcome
    }

    fn process_phase(
        &self,
        phase: Phase,
        key: &RaceKey,
        body: Result<String, FetchError>,
        cleaner: &mut Cleaner,
    ) -> PhaseResult {
        let html = match body {
            Ok(html) => html,
            Err(e) => {
                return PhaseResult::Failed {
                    stage: TargetState::Fetching,
                    err: e.into(),
                }
            }
        };

        let page = match self
            .extractor
            .extract(phase.page(), &html, &ExtractContext::race(key.race_no))
        {
            Ok(page) => page,
            Err(e) => {
                return PhaseResult::Failed {
                    stage: TargetState::Extracting,
                    err: e.into(),
                }
            }
        };

        match normalize::fragment(&page, cleaner) {
            Some(fragment) => PhaseResult::Fragment(fragment),
            None => PhaseResult::Failed {
                stage: TargetState::Cleaning,
                err: ExtractError::UnknownPage(phase.page()).into(),
            },
        }
    }
}
