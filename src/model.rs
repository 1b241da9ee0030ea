//! Domain records for one race aggregate.
//!
//! Race and entry data arrive as partial patches, one per page phase. Every
//! field is optional; merging a later patch replaces only the fields that the
//! later patch actually carries.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::crawler::PageType;
use crate::normalize::season::Season;
use crate::normalize::tables::{BetType, Maneuver, Weather, WindDirection};

/// Natural key of a race
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RaceKey {
    pub date: NaiveDate,
    /// Two-digit venue code
    pub venue: String,
    pub race_no: u8,
}

impl RaceKey {
    pub fn new(date: NaiveDate, venue: impl Into<String>, race_no: u8) -> Self {
        Self {
            date,
            venue: venue.into(),
            race_no,
        }
    }
}

impl fmt::Display for RaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} jcd={} {}R", self.date, self.venue, self.race_no)
    }
}

/// Page phase contributing to a race aggregate, in ingestion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    EntryList,
    PreRace,
    Result,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::EntryList, Phase::PreRace, Phase::Result];

    pub fn page(&self) -> PageType {
        match self {
            Phase::EntryList => PageType::EntryList,
            Phase::PreRace => PageType::PreRace,
            Phase::Result => PageType::Result,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.page().as_str()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Phase::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-wise merge where present values win
pub trait Merge {
    fn merge(&mut self, later: Self);
}

macro_rules! merge_fields {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl Merge for $ty {
            fn merge(&mut self, later: Self) {
                $(
                    if later.$field.is_some() {
                        self.$field = later.$field;
                    }
                )+
            }
        }
    };
}

/// Race-level attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RacePatch {
    pub name: Option<String>,
    pub distance: Option<u32>,
    pub deadline: Option<NaiveTime>,
    pub stabilizer: Option<bool>,
    pub weather: Option<Weather>,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<WindDirection>,
    pub water_temperature: Option<f64>,
    pub wave_height: Option<f64>,
}

merge_fields!(RacePatch {
    name,
    distance,
    deadline,
    stabilizer,
    weather,
    temperature,
    wind_speed,
    wind_direction,
    water_temperature,
    wave_height,
});

/// Per-lane attributes collected across all phases
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntryPatch {
    // Entry list
    pub player_id: Option<u32>,
    pub class: Option<String>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub f_count: Option<u32>,
    pub l_count: Option<u32>,
    pub avg_st: Option<f64>,
    pub national_win_rate: Option<f64>,
    pub national_two_rate: Option<f64>,
    pub national_three_rate: Option<f64>,
    pub local_win_rate: Option<f64>,
    pub local_two_rate: Option<f64>,
    pub local_three_rate: Option<f64>,
    pub motor_no: Option<u32>,
    pub motor_two_rate: Option<f64>,
    pub motor_three_rate: Option<f64>,
    pub boat_no: Option<u32>,
    pub boat_two_rate: Option<f64>,
    pub boat_three_rate: Option<f64>,
    // Pre-race
    pub body_weight: Option<f64>,
    pub tuning_weight: Option<f64>,
    pub exhibition_time: Option<f64>,
    pub tilt: Option<f64>,
    pub propeller: Option<String>,
    pub parts_changed: Option<Vec<String>>,
    pub exhibition_course: Option<u8>,
    pub exhibition_st: Option<f64>,
    // Result
    pub rank_raw: Option<String>,
    pub rank: Option<u8>,
    pub race_time: Option<f64>,
    pub start_course: Option<u8>,
    pub start_st: Option<f64>,
    pub decision: Option<Maneuver>,
}

merge_fields!(EntryPatch {
    player_id,
    class,
    age,
    weight,
    f_count,
    l_count,
    avg_st,
    national_win_rate,
    national_two_rate,
    national_three_rate,
    local_win_rate,
    local_two_rate,
    local_three_rate,
    motor_no,
    motor_two_rate,
    motor_three_rate,
    boat_no,
    boat_two_rate,
    boat_three_rate,
    body_weight,
    tuning_weight,
    exhibition_time,
    tilt,
    propeller,
    parts_changed,
    exhibition_course,
    exhibition_st,
    rank_raw,
    rank,
    race_time,
    start_course,
    start_st,
    decision,
});

/// Player profile as seen on a race page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub player_id: u32,
    pub name: Option<String>,
    pub branch: Option<String>,
    pub hometown: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl PlayerProfile {
    pub fn new(player_id: u32) -> Self {
        Self {
            player_id,
            ..Default::default()
        }
    }
}

merge_fields!(PlayerProfile {
    name,
    branch,
    hometown,
    birth_date,
});

/// One payout line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payout {
    pub bet_type: BetType,
    /// Lane numbers joined with `-`, e.g. "1-2-3"
    pub combination: String,
    /// Yen per 100-yen ticket
    pub amount: i64,
    pub popularity: Option<u32>,
}

/// Race entry at a given lane
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaneEntry {
    pub lane: u8,
    pub entry: EntryPatch,
    /// Phases that contributed to this lane
    pub phases: BTreeSet<Phase>,
}

/// Complete or partial race aggregate ready for persistence
#[derive(Debug, Clone, Serialize)]
pub struct RaceAggregate {
    pub key: RaceKey,
    pub season: Season,
    pub race: RacePatch,
    /// Sorted by lane, at most one per lane
    pub entries: Vec<LaneEntry>,
    pub players: Vec<PlayerProfile>,
    pub payouts: Vec<Payout>,
    /// Phases whose fragment was merged
    pub completed: BTreeSet<Phase>,
    /// Phases still missing, to be retried later
    pub pending: BTreeSet<Phase>,
}

impl RaceAggregate {
    pub fn entry(&self, lane: u8) -> Option<&EntryPatch> {
        self.entries
            .iter()
            .find(|e| e.lane == lane)
            .map(|e| &e.entry)
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}
