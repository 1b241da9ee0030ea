//! Record assembler: merges per-phase fragments into one race aggregate.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::model::{EntryPatch, LaneEntry, Merge, Phase, PlayerProfile, RaceAggregate, RaceKey};
use crate::normalize::season::{Season, SeasonConvention};
use crate::normalize::Fragment;

/// Collects the fragments of one race in any arrival order
#[derive(Debug)]
pub struct Assembler {
    key: RaceKey,
    convention: SeasonConvention,
    fragments: Vec<Fragment>,
    pending: BTreeSet<Phase>,
}

impl Assembler {
    pub fn new(key: RaceKey, convention: SeasonConvention) -> Self {
        Self {
            key,
            convention,
            fragments: Vec::new(),
            pending: BTreeSet::new(),
        }
    }

    pub fn add(&mut self, fragment: Fragment) {
        self.pending.remove(&fragment.phase);
        self.fragments.push(fragment);
    }

    /// Record a phase that failed and must be retried later
    pub fn mark_pending(&mut self, phase: Phase) {
        if !self.fragments.iter().any(|f| f.phase == phase) {
            self.pending.insert(phase);
        }
    }

    pub fn has_fragments(&self) -> bool {
        !self.fragments.is_empty()
    }

    /// Merge fragments in phase order; a later phase only replaces fields
    /// it actually carries.
    pub fn finish(mut self) -> RaceAggregate {
        self.fragments.sort_by_key(|f| f.phase);

        let mut aggregate = RaceAggregate {
            season: Season::of(self.key.date, self.convention),
            key: self.key,
            race: Default::default(),
            entries: Vec::new(),
            players: Vec::new(),
            payouts: Vec::new(),
            completed: BTreeSet::new(),
            pending: self.pending,
        };

        let mut entries: BTreeMap<u8, LaneEntry> = BTreeMap::new();
        let mut players: BTreeMap<u32, PlayerProfile> = BTreeMap::new();

        for fragment in self.fragments {
            debug!("Merging {} fragment into {}", fragment.phase, aggregate.key);
            aggregate.completed.insert(fragment.phase);
            aggregate.race.merge(fragment.race);

            for (lane, entry) in fragment.entries {
                let slot = entries.entry(lane).or_insert_with(|| LaneEntry {
                    lane,
                    entry: EntryPatch::default(),
                    phases: BTreeSet::new(),
                });
                slot.entry.merge(entry);
                slot.phases.insert(fragment.phase);
            }

            for profile in fragment.players {
                match players.get_mut(&profile.player_id) {
                    Some(existing) => existing.merge(profile),
                    None => {
                        players.insert(profile.player_id, profile);
                    }
                }
            }

            for payout in fragment.payouts {
                let duplicate = aggregate.payouts.iter().any(|p| {
                    p.bet_type == payout.bet_type && p.combination == payout.combination
                });
                if !duplicate {
                    aggregate.payouts.push(payout);
                }
            }
        }

        aggregate.entries = entries.into_values().collect();
        aggregate.players = players.into_values().collect();
        aggregate
    }
}

/// Assemble a race from whatever fragments succeeded
pub fn assemble(
    key: RaceKey,
    convention: SeasonConvention,
    fragments: Vec<Fragment>,
    pending: impl IntoIterator<Item = Phase>,
) -> RaceAggregate {
    let mut assembler = Assembler::new(key, convention);
    for fragment in fragments {
        assembler.add(fragment);
    }
    for phase in pending {
        assembler.mark_pending(phase);
    }
    assembler.finish()
}
