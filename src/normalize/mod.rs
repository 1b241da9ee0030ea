//! Conversion of raw extracted strings into typed domain values.
//!
//! Every conversion is field-scoped: a value that cannot be parsed becomes
//! absent and leaves a [`NormalizationWarning`] behind, never an error.

pub mod season;
pub mod tables;

use chrono::NaiveTime;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::crawler::PageType;
use crate::model::{EntryPatch, Payout, Phase, PlayerProfile, RacePatch};
use crate::selectors::{raw, RawPage, RawRecord};
use tables::{lane_from_marker, BetType, Maneuver, Weather, WindDirection};

/// A field that could not be converted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationWarning {
    pub field: String,
    pub raw: String,
    pub reason: String,
}

const PLACEHOLDERS: &[&str] = &["", "-", "--", "---", "-.--", "ー", "―", "‐"];

/// Fold full-width ASCII variants and the ideographic space to their
/// half-width forms
pub fn fold_width(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            '\u{3000}' => ' ',
            other => other,
        })
        .collect()
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?(?:\d+(?:\.\d+)?|\.\d+)").unwrap())
}

fn race_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^(\d+)'(\d{1,2})"(\d)$"#).unwrap())
}

fn start_timing_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([FL])?\s*(\d*\.\d+)").unwrap())
}

/// Field-type-driven conversions that collect warnings as they go
#[derive(Debug, Default)]
pub struct Cleaner {
    warnings: Vec<NormalizationWarning>,
}

impl Cleaner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[NormalizationWarning] {
        &self.warnings
    }

    fn warn(&mut self, field: &str, raw: &str, reason: &str) {
        warn!("Unparseable {} value '{}': {}", field, raw, reason);
        self.warnings.push(NormalizationWarning {
            field: field.to_string(),
            raw: raw.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Width-folded, trimmed value; placeholders become absent
    fn folded(raw: Option<&str>) -> Option<String> {
        let folded = fold_width(raw?);
        let trimmed = folded.trim();
        if PLACEHOLDERS.contains(&trimmed) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn text(&mut self, raw: Option<&str>) -> Option<String> {
        let value = raw?.trim();
        let folded = fold_width(value);
        if PLACEHOLDERS.contains(&folded.trim()) {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Person name with all (full-width) spaces removed
    pub fn name(&mut self, raw: Option<&str>) -> Option<String> {
        let name: String = self
            .text(raw)?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        (!name.is_empty()).then_some(name)
    }

    /// Fixed-point decimal with any unit suffix stripped ("52.0kg" -> 52.0)
    pub fn decimal(&mut self, field: &str, raw: Option<&str>) -> Option<f64> {
        let value = Self::folded(raw)?;
        let parsed = number_re()
            .find(&value)
            .and_then(|m| m.as_str().parse::<f64>().ok());
        if parsed.is_none() {
            self.warn(field, &value, "not a number");
        }
        parsed
    }

    /// Unsigned integer with any unit suffix stripped ("39歳" -> 39)
    pub fn integer(&mut self, field: &str, raw: Option<&str>) -> Option<u32> {
        let value = Self::folded(raw)?;
        let digits: String = value
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let parsed = digits.parse::<u32>().ok();
        if parsed.is_none() {
            self.warn(field, &value, "not an integer");
        }
        parsed
    }

    /// Counter written as a fixed letter and a digit ("F1" -> 1)
    pub fn counter(&mut self, field: &str, raw: Option<&str>, prefix: char) -> Option<u32> {
        let value = Self::folded(raw)?;
        let parsed = value
            .strip_prefix(prefix)
            .and_then(|rest| rest.trim().parse::<u32>().ok());
        if parsed.is_none() {
            self.warn(field, &value, &format!("expected {}<digits>", prefix));
        }
        parsed
    }

    /// Finishing rank: numeric tokens map to 1-6, any other outcome token
    /// (flying, late start, disqualification, no-show...) to 6. The raw token
    /// is returned unchanged for audit.
    pub fn rank(&mut self, field: &str, raw: Option<&str>) -> (Option<String>, Option<u8>) {
        let token = match raw.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return (None, None),
        };
        let folded = fold_width(&token);
        let folded = folded.trim();

        if folded.chars().all(|c| c.is_ascii_digit()) {
            return match folded.parse::<u8>() {
                Ok(n @ 1..=6) => (Some(token), Some(n)),
                _ => {
                    self.warn(field, &token, "rank out of range");
                    (Some(token), None)
                }
            };
        }

        debug!("Non-numeric outcome '{}' ranked 6", token);
        (Some(token), Some(6))
    }

    /// Race time such as `1'49"8` in seconds
    pub fn race_time(&mut self, field: &str, raw: Option<&str>) -> Option<f64> {
        let value = Self::folded(raw)?;
        let parsed = race_time_re().captures(&value).and_then(|caps| {
            let minutes: f64 = caps[1].parse().ok()?;
            let seconds: f64 = caps[2].parse().ok()?;
            let tenths: f64 = caps[3].parse().ok()?;
            Some(minutes * 60.0 + seconds + tenths / 10.0)
        });
        if parsed.is_none() {
            self.warn(field, &value, "expected M'SS\"T");
        }
        parsed.map(|t| (t * 10.0).round() / 10.0)
    }

    /// Start timing (".08"); flying starts are negative ("F.01" -> -0.01)
    pub fn start_timing(&mut self, field: &str, raw: Option<&str>, flying: bool) -> Option<f64> {
        let value = Self::folded(raw)?;
        let parsed = start_timing_re().captures(&value).and_then(|caps| {
            let st: f64 = caps[2].parse().ok()?;
            let is_flying = flying || caps.get(1).is_some_and(|m| m.as_str() == "F");
            Some(if is_flying { -st } else { st })
        });
        if parsed.is_none() {
            self.warn(field, &value, "not a start timing");
        }
        parsed
    }

    /// Clock time "HH:MM"
    pub fn clock(&mut self, field: &str, raw: Option<&str>) -> Option<NaiveTime> {
        let value = Self::folded(raw)?;
        let parsed = NaiveTime::parse_from_str(&value, "%H:%M").ok();
        if parsed.is_none() {
            self.warn(field, &value, "expected HH:MM");
        }
        parsed
    }

    /// Currency amount with symbol and separators stripped ("¥1,230" -> 1230)
    pub fn amount(&mut self, field: &str, raw: Option<&str>) -> Option<i64> {
        let value = Self::folded(raw)?;
        let digits: String = value
            .chars()
            .filter(|c| !matches!(c, '¥' | '￥' | '$' | ',' | '円') && !c.is_whitespace())
            .collect();
        let parsed = digits.parse::<i64>().ok();
        if parsed.is_none() {
            self.warn(field, &value, "not an amount");
        }
        parsed
    }

    pub fn flag(&mut self, field: &str, raw: Option<&str>) -> Option<bool> {
        match raw?.trim() {
            "true" => Some(true),
            "false" => Some(false),
            other => {
                self.warn(field, other, "not a flag");
                None
            }
        }
    }

    /// Categorical value encoded as a numeric marker suffix
    pub fn marker<T>(&mut self, field: &str, raw: Option<&str>, table: impl Fn(u32) -> Option<T>) -> Option<T> {
        let value = Self::folded(raw)?;
        let mapped = value.parse::<u32>().ok().and_then(table);
        if mapped.is_none() {
            self.warn(field, &value, "unknown marker");
        }
        mapped
    }

    /// Categorical value encoded as a label
    pub fn label<T>(&mut self, field: &str, raw: Option<&str>, table: impl Fn(&str) -> Option<T>) -> Option<T> {
        let value = self.text(raw)?;
        let mapped = table(&value);
        if mapped.is_none() {
            self.warn(field, &value, "unknown label");
        }
        mapped
    }
}

/// Typed contribution of one page to a race aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub phase: Phase,
    pub race: RacePatch,
    pub entries: BTreeMap<u8, EntryPatch>,
    pub players: Vec<PlayerProfile>,
    pub payouts: Vec<Payout>,
}

impl Fragment {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            race: RacePatch::default(),
            entries: BTreeMap::new(),
            players: Vec::new(),
            payouts: Vec::new(),
        }
    }
}

/// Venue listed on a schedule index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledVenue {
    pub code: String,
    pub race_count: Option<u8>,
}

/// Convert an extracted race page into a fragment
pub fn fragment(page: &RawPage, cleaner: &mut Cleaner) -> Option<Fragment> {
    match page.page {
        PageType::EntryList => Some(entry_list(page, cleaner)),
        PageType::PreRace => Some(pre_race(page, cleaner)),
        PageType::Result => Some(result(page, cleaner)),
        PageType::ScheduleIndex => None,
    }
}

/// Active venues on a schedule index, in page order and without duplicates
pub fn schedule(page: &RawPage, cleaner: &mut Cleaner) -> Vec<ScheduledVenue> {
    let mut venues: Vec<ScheduledVenue> = Vec::new();
    for row in page.group("venues") {
        let code = match Cleaner::folded(raw(row, "venue_code")) {
            Some(c) if c.len() == 2 && c.chars().all(|ch| ch.is_ascii_digit()) => c,
            Some(c) => {
                cleaner.warn("venues.venue_code", &c, "not a venue code");
                continue;
            }
            None => continue,
        };
        let race_count = cleaner
            .integer("venues.race_count", raw(row, "race_count"))
            .and_then(|n| u8::try_from(n).ok());
        if !venues.iter().any(|v| v.code == code) {
            venues.push(ScheduledVenue { code, race_count });
        }
    }
    venues
}

fn lane_of(row: &RawRecord, scope: &str, cleaner: &mut Cleaner, by_marker: bool) -> Option<u8> {
    let field = format!("{}.lane", scope);
    let lane = if by_marker {
        cleaner.marker(&field, raw(row, "lane"), lane_from_marker)
    } else {
        cleaner
            .integer(&field, raw(row, "lane"))
            .and_then(lane_from_marker)
    };
    if lane.is_none() {
        debug!("Skipping {} row without a lane", scope);
    }
    lane
}

fn weather(page: &RawPage, cleaner: &mut Cleaner) -> RacePatch {
    RacePatch {
        weather: cleaner.label("weather", page.field("weather"), Weather::from_label),
        temperature: cleaner.decimal("temperature", page.field("temperature")),
        wind_speed: cleaner.decimal("wind_speed", page.field("wind_speed")),
        wind_direction: cleaner.marker(
            "wind_direction",
            page.field("wind_direction"),
            WindDirection::from_marker,
        ),
        water_temperature: cleaner.decimal("water_temperature", page.field("water_temperature")),
        wave_height: cleaner.decimal("wave_height", page.field("wave_height")),
        ..Default::default()
    }
}

/// Entry list: race header, per-lane player data and player profiles
pub fn entry_list(page: &RawPage, cleaner: &mut Cleaner) -> Fragment {
    let mut fragment = Fragment::new(Phase::EntryList);

    fragment.race = RacePatch {
        name: cleaner.text(page.field("race_name")),
        distance: cleaner.integer("distance", page.field("distance")),
        deadline: cleaner.clock("deadline", page.field("deadline")),
        stabilizer: cleaner.flag("stabilizer", page.field("stabilizer")),
        ..Default::default()
    };

    for row in page.group("entries") {
        let Some(lane) = lane_of(row, "entries", cleaner, true) else {
            continue;
        };
        let f = |name: &str| format!("entries[{}].{}", lane, name);

        let entry = EntryPatch {
            player_id: cleaner.integer(&f("player_id"), raw(row, "player_id")),
            class: cleaner.text(raw(row, "class")),
            age: cleaner.integer(&f("age"), raw(row, "age")),
            weight: cleaner.decimal(&f("weight"), raw(row, "weight")),
            f_count: cleaner.counter(&f("f_count"), raw(row, "f_count"), 'F'),
            l_count: cleaner.counter(&f("l_count"), raw(row, "l_count"), 'L'),
            avg_st: cleaner.decimal(&f("avg_st"), raw(row, "avg_st")),
            national_win_rate: cleaner.decimal(&f("national_win_rate"), raw(row, "national_win_rate")),
            national_two_rate: cleaner.decimal(&f("national_two_rate"), raw(row, "national_two_rate")),
            national_three_rate: cleaner.decimal(&f("national_three_rate"), raw(row, "national_three_rate")),
            local_win_rate: cleaner.decimal(&f("local_win_rate"), raw(row, "local_win_rate")),
            local_two_rate: cleaner.decimal(&f("local_two_rate"), raw(row, "local_two_rate")),
            local_three_rate: cleaner.decimal(&f("local_three_rate"), raw(row, "local_three_rate")),
            motor_no: cleaner.integer(&f("motor_no"), raw(row, "motor_no")),
            motor_two_rate: cleaner.decimal(&f("motor_two_rate"), raw(row, "motor_two_rate")),
            motor_three_rate: cleaner.decimal(&f("motor_three_rate"), raw(row, "motor_three_rate")),
            boat_no: cleaner.integer(&f("boat_no"), raw(row, "boat_no")),
            boat_two_rate: cleaner.decimal(&f("boat_two_rate"), raw(row, "boat_two_rate")),
            boat_three_rate: cleaner.decimal(&f("boat_three_rate"), raw(row, "boat_three_rate")),
            ..Default::default()
        };

        if let Some(player_id) = entry.player_id {
            fragment.players.push(PlayerProfile {
                player_id,
                name: cleaner.name(raw(row, "name")),
                branch: cleaner.text(raw(row, "branch")),
                hometown: cleaner.text(raw(row, "hometown")),
                birth_date: None,
            });
        }
        fragment.entries.insert(lane, entry);
    }

    fragment
}

/// Pre-race information: weather, exhibition data and start exhibition
pub fn pre_race(page: &RawPage, cleaner: &mut Cleaner) -> Fragment {
    let mut fragment = Fragment::new(Phase::PreRace);
    fragment.race = weather(page, cleaner);

    for row in page.group("entries") {
        let Some(lane) = lane_of(row, "entries", cleaner, false) else {
            continue;
        };
        let f = |name: &str| format!("entries[{}].{}", lane, name);

        let parts_changed = cleaner.text(raw(row, "parts_changed")).map(|joined| {
            joined
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let entry = EntryPatch {
            body_weight: cleaner.decimal(&f("body_weight"), raw(row, "body_weight")),
            tuning_weight: cleaner.decimal(&f("tuning_weight"), raw(row, "tuning_weight")),
            exhibition_time: cleaner.decimal(&f("exhibition_time"), raw(row, "exhibition_time")),
            tilt: cleaner.decimal(&f("tilt"), raw(row, "tilt")),
            propeller: cleaner.text(raw(row, "propeller")),
            parts_changed: parts_changed.filter(|p| !p.is_empty()),
            ..Default::default()
        };
        fragment.entries.insert(lane, entry);
    }

    for row in page.group("start_exhibition") {
        let Some(lane) = lane_of(row, "start_exhibition", cleaner, true) else {
            continue;
        };
        let f = |name: &str| format!("start_exhibition[{}].{}", lane, name);
        let flying = cleaner.flag(&f("flying"), raw(row, "flying")).unwrap_or(false);

        let entry = fragment.entries.entry(lane).or_default();
        entry.exhibition_course = cleaner
            .integer(&f("course"), raw(row, "course"))
            .and_then(lane_from_marker);
        entry.exhibition_st = cleaner.start_timing(&f("st"), raw(row, "st"), flying);
    }

    fragment
}

/// Race result: ranks, times, start timings, maneuver, weather and payouts
pub fn result(page: &RawPage, cleaner: &mut Cleaner) -> Fragment {
    let mut fragment = Fragment::new(Phase::Result);
    fragment.race = weather(page, cleaner);

    for row in page.group("results") {
        let Some(lane) = lane_of(row, "results", cleaner, false) else {
            continue;
        };
        let f = |name: &str| format!("results[{}].{}", lane, name);

        let (rank_raw, rank) = cleaner.rank(&f("rank"), raw(row, "rank"));
        let entry = EntryPatch {
            player_id: cleaner.integer(&f("player_id"), raw(row, "player_id")),
            rank_raw,
            rank,
            race_time: cleaner.race_time(&f("race_time"), raw(row, "race_time")),
            ..Default::default()
        };

        if let Some(player_id) = entry.player_id {
            let mut profile = PlayerProfile::new(player_id);
            profile.name = cleaner.name(raw(row, "name"));
            fragment.players.push(profile);
        }
        fragment.entries.insert(lane, entry);
    }

    for row in page.group("starts") {
        let Some(lane) = lane_of(row, "starts", cleaner, true) else {
            continue;
        };
        let f = |name: &str| format!("starts[{}].{}", lane, name);

        let entry = fragment.entries.entry(lane).or_default();
        entry.start_course = cleaner
            .integer(&f("course"), raw(row, "course"))
            .and_then(lane_from_marker);
        entry.start_st = cleaner.start_timing(&f("st"), raw(row, "st"), false);
    }

    if let Some(decision) = cleaner.label("decision", page.field("decision"), Maneuver::from_label) {
        match fragment.entries.values_mut().find(|e| e.rank == Some(1)) {
            Some(winner) => winner.decision = Some(decision),
            None => debug!("Maneuver {} without a winning entry", decision.as_str()),
        }
    }

    for (i, row) in page.group("payouts").iter().enumerate() {
        let f = |name: &str| format!("payouts[{}].{}", i, name);
        let Some(bet_type) = cleaner.label(&f("bet_type"), raw(row, "bet_type"), BetType::from_label) else {
            continue;
        };
        let Some(combination) = Cleaner::folded(raw(row, "combination")) else {
            continue;
        };
        let Some(amount) = cleaner.amount(&f("amount"), raw(row, "amount")) else {
            continue;
        };
        fragment.payouts.push(Payout {
            bet_type,
            combination,
            amount,
            popularity: cleaner.integer(&f("popularity"), raw(row, "popularity")),
        });
    }

    fragment
}
