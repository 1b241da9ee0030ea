//! Target enumeration: which (date, venue, race) triples to harvest.
//!
//! Targets are re-derived from the schedule index on every run and never
//! persisted.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, error, info, warn};

use crate::crawler::{Fetcher, Locator, PageType, RateLimiter};
use crate::error::{ExtractError, HarvestError};
use crate::model::RaceKey;
use crate::normalize::{self, Cleaner};
use crate::selectors::{ExtractContext, Extractor};

/// Highest race number a venue can hold in one day
pub const MAX_RACES: u8 = 12;

/// Optional venue and race-number restrictions
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    pub venues: Option<BTreeSet<String>>,
    pub races: Option<BTreeSet<u8>>,
}

impl TargetFilter {
    fn allows_venue(&self, code: &str) -> bool {
        self.venues.as_ref().map_or(true, |v| v.contains(code))
    }

    fn allows_race(&self, race_no: u8) -> bool {
        self.races.as_ref().map_or(true, |r| r.contains(&race_no))
    }
}

/// Every date from `start` to `end`, inclusive
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Derives race targets for a date from its schedule index
pub struct TargetEnumerator<'a> {
    fetcher: &'a Fetcher,
    limiter: &'a RateLimiter,
    extractor: &'a Extractor,
    locator: &'a Locator,
    race_numbers: &'a [u8],
}

impl<'a> TargetEnumerator<'a> {
    pub fn new(
        fetcher: &'a Fetcher,
        limiter: &'a RateLimiter,
        extractor: &'a Extractor,
        locator: &'a Locator,
        race_numbers: &'a [u8],
    ) -> Self {
        Self {
            fetcher,
            limiter,
            extractor,
            locator,
            race_numbers,
        }
    }

    /// Targets for one date, in venue then race order.
    ///
    /// A date with no racing yields no targets. An index that cannot be
    /// fetched or no longer matches the selector map is an error for this
    /// date only.
    pub async fn targets_for(
        &self,
        date: NaiveDate,
        filter: &TargetFilter,
    ) -> Result<Vec<RaceKey>, HarvestError> {
        let url = self.locator.schedule_index(date);
        let html = self
            .fetcher
            .fetch(&url, self.limiter)
            .await
            .map_err(|source| HarvestError::ScheduleUnavailable { date, source })?;

        let page = match self
            .extractor
            .extract(PageType::ScheduleIndex, &html, &ExtractContext::default())
        {
            Ok(page) => page,
            Err(ExtractError::NotPublished { marker, .. }) => {
                info!("No racing on {}: {}", date, marker);
                return Ok(Vec::new());
            }
            Err(e) => {
                if matches!(e, ExtractError::SchemaMismatch { .. }) {
                    error!(alert = "selector_map_stale", "Schedule index for {}: {}", date, e);
                }
                return Err(e.into());
            }
        };

        let mut cleaner = Cleaner::new();
        let venues = normalize::schedule(&page, &mut cleaner);
        if venues.is_empty() {
            warn!("Schedule index for {} lists no venues", date);
        }

        let mut targets = Vec::new();
        for venue in venues.iter().filter(|v| filter.allows_venue(&v.code)) {
            let last = venue.race_count.unwrap_or(MAX_RACES).min(MAX_RACES);
            let races: Vec<u8> = self
                .race_numbers
                .iter()
                .copied()
                .filter(|n| (1..=last).contains(n) && filter.allows_race(*n))
                .collect();
            debug!("{} jcd={}: {} races", date, venue.code, races.len());
            targets.extend(races.into_iter().map(|n| RaceKey::new(date, venue.code.clone(), n)));
        }

        if let Some(wanted) = &filter.venues {
            for code in wanted.iter().filter(|c| !venues.iter().any(|v| &v.code == *c)) {
                debug!("Venue {} not active on {}, skipping", code, date);
            }
        }

        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::tests::{fast_retry, unpaced, ScriptedTransport};
    use crate::error::FailureClass;
    use crate::fixtures;
    use crate::selectors::{FieldRule, SelectorMap};
    use std::sync::Arc;

    const BASE: &str = "https://race.test/pc";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 27).unwrap()
    }

    /// Built-in map plus the per-venue race count cell
    fn create_test_extractor() -> Extractor {
        let mut map = SelectorMap::builtin().unwrap();
        map.pages
            .get_mut(&PageType::ScheduleIndex)
            .unwrap()
            .groups
            .get_mut("venues")
            .unwrap()
            .fields
            .insert(
                "race_count".to_string(),
                FieldRule {
                    selector: Some("td.is-raceCount".to_string()),
                    ..Default::default()
                },
            );
        Extractor::new(map).unwrap()
    }

    async fn run(
        transport: Arc<ScriptedTransport>,
        extractor: &Extractor,
        filter: &TargetFilter,
    ) -> Result<Vec<RaceKey>, HarvestError> {
        let fetcher = Fetcher::with_transport(transport, fast_retry());
        let limiter = unpaced();
        let locator = Locator::new(BASE);
        let canonical: Vec<u8> = (1..=12).collect();
        TargetEnumerator::new(&fetcher, &limiter, extractor, &locator, &canonical)
            .targets_for(date(), filter)
            .await
    }

    #[test]
    fn test_date_range_inclusive() {
        let days = date_range(date(), NaiveDate::from_ymd_opt(2025, 4, 29).unwrap());
        assert_eq!(days.len(), 3);
        assert!(date_range(date(), NaiveDate::from_ymd_opt(2025, 4, 26).unwrap()).is_empty());
    }

    #[tokio::test]
    async fn test_active_venues_bounded_by_race_count() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok(&Locator::new(BASE).schedule_index(date()), fixtures::SCHEDULE_INDEX_HTML);

        let targets = run(transport, &create_test_extractor(), &TargetFilter::default())
            .await
            .unwrap();

        // 12 + 8 + 12
        assert_eq!(targets.len(), 32);
        assert_eq!(targets[0], RaceKey::new(date(), "01", 1));
        let heiwajima: Vec<u8> = targets
            .iter()
            .filter(|k| k.venue == "04")
            .map(|k| k.race_no)
            .collect();
        assert_eq!(heiwajima, (1..=8).collect::<Vec<u8>>());
    }

    #[tokio::test]
    async fn test_filters_intersect_schedule() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok(&Locator::new(BASE).schedule_index(date()), fixtures::SCHEDULE_INDEX_HTML);
        let filter = TargetFilter {
            venues: Some(BTreeSet::from(["04".to_string(), "07".to_string()])),
            races: Some(BTreeSet::from([6, 10])),
        };

        let targets = run(transport, &create_test_extractor(), &filter).await.unwrap();

        // Venue 07 is not racing; venue 04 only runs 8 races
        assert_eq!(targets, vec![RaceKey::new(date(), "04", 6)]);
    }

    #[tokio::test]
    async fn test_builtin_map_defaults_to_canonical_range() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok(&Locator::new(BASE).schedule_index(date()), fixtures::SCHEDULE_INDEX_HTML);
        let extractor = Extractor::load(None).unwrap();

        let targets = run(transport, &extractor, &TargetFilter::default()).await.unwrap();
        assert_eq!(targets.len(), 36);
    }

    #[tokio::test]
    async fn test_unfetchable_index_is_schedule_unavailable() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.status(&Locator::new(BASE).schedule_index(date()), 503);

        let err = run(transport.clone(), &create_test_extractor(), &TargetFilter::default())
            .await
            .unwrap_err();

        assert_eq!(err.class(), FailureClass::ScheduleUnavailable);
        assert_eq!(transport.calls(&Locator::new(BASE).schedule_index(date())), 3);
    }

    #[tokio::test]
    async fn test_no_racing_day_is_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok(
            &Locator::new(BASE).schedule_index(date()),
            "<html><body><div class=\"table1\"><p>本日の開催はありません</p></div></body></html>",
        );

        let targets = run(transport, &create_test_extractor(), &TargetFilter::default())
            .await
            .unwrap();
        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_changed_index_layout_raises_mismatch() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok(
            &Locator::new(BASE).schedule_index(date()),
            "<html><body><main>redesigned</main></body></html>",
        );

        let err = run(transport, &create_test_extractor(), &TargetFilter::default())
            .await
            .unwrap_err();
        assert_eq!(err.class(), FailureClass::ExtractionSchemaMismatch);
    }
}
