//! SQLite repository for race aggregates

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, warn};

use super::schema::create_tables;
use crate::model::{EntryPatch, Phase, PlayerProfile, RaceAggregate, RaceKey};

/// Venue reference data: (jcd, name, prefecture)
pub const VENUES: [(&str, &str, &str); 24] = [
    ("01", "桐生", "群馬"),
    ("02", "戸田", "埼玉"),
    ("03", "江戸川", "東京"),
    ("04", "平和島", "東京"),
    ("05", "多摩川", "東京"),
    ("06", "浜名湖", "静岡"),
    ("07", "蒲郡", "愛知"),
    ("08", "常滑", "愛知"),
    ("09", "津", "三重"),
    ("10", "三国", "福井"),
    ("11", "びわこ", "滋賀"),
    ("12", "住之江", "大阪"),
    ("13", "尼崎", "兵庫"),
    ("14", "鳴門", "徳島"),
    ("15", "丸亀", "香川"),
    ("16", "児島", "岡山"),
    ("17", "宮島", "広島"),
    ("18", "徳山", "山口"),
    ("19", "下関", "山口"),
    ("20", "若松", "福岡"),
    ("21", "芦屋", "福岡"),
    ("22", "福岡", "福岡"),
    ("23", "唐津", "佐賀"),
    ("24", "大村", "長崎"),
];

const RACE_COLUMNS: [&str; 12] = [
    "race_name",
    "distance",
    "deadline",
    "stabilizer",
    "weather",
    "temperature",
    "wind_speed",
    "wind_dir",
    "water_temp",
    "wave_height",
    "season_year",
    "season_term",
];

const ENTRY_COLUMNS: [&str; 33] = [
    "player_id",
    "class",
    "age",
    "weight",
    "f_count",
    "l_count",
    "avg_st",
    "nationwide_win_rate",
    "nationwide_two_win_rate",
    "nationwide_three_win_rate",
    "local_win_rate",
    "local_two_win_rate",
    "local_three_win_rate",
    "motor_no",
    "motor_two_win_rate",
    "motor_three_win_rate",
    "boat_no",
    "boat_two_win_rate",
    "boat_three_win_rate",
    "body_weight",
    "tuning_weight",
    "exhibition_time",
    "tilt",
    "propeller",
    "parts_changed",
    "exhibition_course",
    "exhibition_st",
    "rank_raw",
    "rank",
    "race_time",
    "start_course",
    "start_st",
    "decision",
];

/// Upsert where an incoming NULL keeps the stored value
fn merge_upsert_sql(table: &str, keys: &[&str], columns: &[&str], extra: &str) -> String {
    let all: Vec<&str> = keys.iter().chain(columns.iter()).copied().collect();
    let placeholders: Vec<String> = (1..=all.len()).map(|i| format!("?{}", i)).collect();
    let updates: Vec<String> = columns
        .iter()
        .map(|c| format!("{c} = COALESCE(excluded.{c}, {table}.{c})"))
        .collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({}) ON CONFLICT({}) DO UPDATE SET {}{extra}",
        all.join(", "),
        placeholders.join(", "),
        keys.join(", "),
        updates.join(", "),
    )
}

/// Race row as stored
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRace {
    pub race_id: i64,
    pub race_name: Option<String>,
    pub distance: Option<u32>,
    pub deadline: Option<String>,
    pub stabilizer: Option<bool>,
    pub weather: Option<String>,
    pub wind_dir: Option<String>,
    pub wave_height: Option<f64>,
    pub season_year: i32,
    pub season_term: u8,
}

/// Race entry row as stored
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub lane: u8,
    pub player_id: u32,
    pub class: Option<String>,
    pub weight: Option<f64>,
    pub f_count: Option<u32>,
    pub body_weight: Option<f64>,
    pub parts_changed: Option<Vec<String>>,
    pub exhibition_st: Option<f64>,
    pub rank_raw: Option<String>,
    pub rank: Option<u8>,
    pub race_time: Option<f64>,
    pub start_course: Option<u8>,
    pub start_st: Option<f64>,
    pub decision: Option<String>,
}

/// Payout row as stored
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPayout {
    pub bet_type: String,
    pub combination: String,
    pub amount: i64,
    pub popularity: Option<u32>,
}

/// Race with phases still to be retried
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTarget {
    pub key: RaceKey,
    pub phases: BTreeSet<Phase>,
}

/// Outcome of persisting one aggregate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    pub race_id: i64,
    pub entries_written: usize,
    pub entries_skipped: usize,
    pub payouts_inserted: usize,
    /// Completed phases kept in the pending ledger because some of their
    /// lanes could not be written
    pub deferred: BTreeSet<Phase>,
}

/// Repository for harvested race data
pub struct RaceRepository {
    conn: Connection,
}

impl RaceRepository {
    /// Create a new repository, initializing the database if needed
    pub fn new(db_path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(db_path).context("Failed to open database")?;

        // Enable foreign keys
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        // Create tables if they don't exist
        create_tables(&conn)?;

        Ok(Self { conn })
    }

    /// Create an in-memory repository (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    // ==================== Reference Data ====================

    /// Insert the venue reference set; existing rows are left alone
    pub fn seed_venues(&self) -> Result<usize> {
        let mut inserted = 0;
        for (jcd, name, pref) in VENUES {
            inserted += self.conn.execute(
                "INSERT INTO venue (jcd, name, pref) VALUES (?1, ?2, ?3) ON CONFLICT(jcd) DO NOTHING",
                params![jcd, name, pref],
            )?;
        }
        Ok(inserted)
    }

    pub fn venue_exists(&self, jcd: &str) -> Result<bool> {
        venue_exists(&self.conn, jcd)
    }

    // ==================== Insert Operations ====================

    /// Persist one race aggregate atomically.
    ///
    /// Race and entry columns are merged field by field; players are
    /// inserted if absent and only have missing profile fields filled;
    /// payouts are written once. The pending-phase ledger for the race is
    /// updated in the same transaction.
    pub fn save_aggregate(&mut self, aggregate: &RaceAggregate) -> Result<SaveReport> {
        let tx = self.conn.transaction()?;
        let report = write_aggregate(&tx, aggregate)
            .with_context(|| format!("Failed to persist race {}", aggregate.key))?;
        tx.commit().context("Failed to commit race aggregate")?;

        debug!(
            "Saved {}: {} entries, {} new payouts",
            aggregate.key, report.entries_written, report.payouts_inserted
        );
        Ok(report)
    }

    /// Overwrite player profile fields explicitly (absent fields are kept)
    pub fn correct_player(&self, profile: &PlayerProfile) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO player (player_id, name, branch, hometown, birth_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(player_id) DO UPDATE SET
                name = COALESCE(excluded.name, player.name),
                branch = COALESCE(excluded.branch, player.branch),
                hometown = COALESCE(excluded.hometown, player.hometown),
                birth_date = COALESCE(excluded.birth_date, player.birth_date)
            "#,
            params![
                profile.player_id,
                profile.name,
                profile.branch,
                profile.hometown,
                profile.birth_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    // ==================== Query Operations ====================

    /// Check if a race exists
    #[cfg(test)]
    pub fn race_exists(&self, key: &RaceKey) -> Result<bool> {
        Ok(race_id(&self.conn, key)?.is_some())
    }

    pub fn get_race(&self, key: &RaceKey) -> Result<Option<StoredRace>> {
        let race = self
            .conn
            .query_row(
                r#"
                SELECT race_id, race_name, distance, deadline, stabilizer, weather,
                       wind_dir, wave_height, season_year, season_term
                FROM race
                WHERE hd = ?1 AND jcd = ?2 AND rno = ?3
                "#,
                params![key.date.to_string(), key.venue, key.race_no],
                |row| {
                    Ok(StoredRace {
                        race_id: row.get(0)?,
                        race_name: row.get(1)?,
                        distance: row.get(2)?,
                        deadline: row.get(3)?,
                        stabilizer: row.get(4)?,
                        weather: row.get(5)?,
                        wind_dir: row.get(6)?,
                        wave_height: row.get(7)?,
                        season_year: row.get(8)?,
                        season_term: row.get(9)?,
                    })
                },
            )
            .optional()?;
        Ok(race)
    }

    /// Get entries for a race ordered by lane
    pub fn get_entries(&self, key: &RaceKey) -> Result<Vec<StoredEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT e.lane, e.player_id, e.class, e.weight, e.f_count, e.body_weight,
                   e.parts_changed, e.exhibition_st, e.rank_raw, e.rank, e.race_time,
                   e.start_course, e.start_st, e.decision
            FROM race_entry e
            JOIN race r ON r.race_id = e.race_id
            WHERE r.hd = ?1 AND r.jcd = ?2 AND r.rno = ?3
            ORDER BY e.lane
            "#,
        )?;

        let rows = stmt.query_map(params![key.date.to_string(), key.venue, key.race_no], |row| {
            let parts: Option<String> = row.get(6)?;
            Ok(StoredEntry {
                lane: row.get(0)?,
                player_id: row.get(1)?,
                class: row.get(2)?,
                weight: row.get(3)?,
                f_count: row.get(4)?,
                body_weight: row.get(5)?,
                parts_changed: parts.and_then(|p| serde_json::from_str(&p).ok()),
                exhibition_st: row.get(7)?,
                rank_raw: row.get(8)?,
                rank: row.get(9)?,
                race_time: row.get(10)?,
                start_course: row.get(11)?,
                start_st: row.get(12)?,
                decision: row.get(13)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    pub fn get_payouts(&self, key: &RaceKey) -> Result<Vec<StoredPayout>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.bet_type, p.combination, p.amount, p.popularity
            FROM payout p
            JOIN race r ON r.race_id = p.race_id
            WHERE r.hd = ?1 AND r.jcd = ?2 AND r.rno = ?3
            ORDER BY p.payout_id
            "#,
        )?;

        let rows = stmt.query_map(params![key.date.to_string(), key.venue, key.race_no], |row| {
            Ok(StoredPayout {
                bet_type: row.get(0)?,
                combination: row.get(1)?,
                amount: row.get(2)?,
                popularity: row.get(3)?,
            })
        })?;

        let mut payouts = Vec::new();
        for row in rows {
            payouts.push(row?);
        }
        Ok(payouts)
    }

    pub fn get_player(&self, player_id: u32) -> Result<Option<PlayerProfile>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, branch, hometown, birth_date FROM player WHERE player_id = ?1",
                [player_id],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(name, branch, hometown, birth_date)| PlayerProfile {
            player_id,
            name,
            branch,
            hometown,
            birth_date: birth_date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        }))
    }

    /// Races with phases still waiting for a retry pass
    pub fn pending_phases(&self) -> Result<Vec<PendingTarget>> {
        let mut stmt = self.conn.prepare(
            "SELECT hd, jcd, rno, phase FROM pending_phase ORDER BY hd, jcd, rno",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u8>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut targets: BTreeMap<RaceKey, BTreeSet<Phase>> = BTreeMap::new();
        for row in rows {
            let (hd, jcd, rno, phase_name) = row?;
            let date = NaiveDate::parse_from_str(&hd, "%Y-%m-%d")
                .with_context(|| format!("Invalid pending date: {}", hd))?;
            let Some(phase) = Phase::from_name(&phase_name) else {
                warn!("Ignoring unknown pending phase '{}'", phase_name);
                continue;
            };
            targets
                .entry(RaceKey::new(date, jcd, rno))
                .or_default()
                .insert(phase);
        }

        Ok(targets
            .into_iter()
            .map(|(key, phases)| PendingTarget { key, phases })
            .collect())
    }

    /// Get total race count
    pub fn get_race_count(&self) -> Result<i32> {
        count(&self.conn, "race")
    }

    pub fn get_entry_count(&self) -> Result<i32> {
        count(&self.conn, "race_entry")
    }

    pub fn get_payout_count(&self) -> Result<i32> {
        count(&self.conn, "payout")
    }

    pub fn get_player_count(&self) -> Result<i32> {
        count(&self.conn, "player")
    }
}

fn count(conn: &Connection, table: &str) -> Result<i32> {
    let count: i32 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}

fn venue_exists(conn: &Connection, jcd: &str) -> Result<bool> {
    let count: i32 = conn.query_row("SELECT COUNT(*) FROM venue WHERE jcd = ?1", [jcd], |row| {
        row.get(0)
    })?;
    Ok(count > 0)
}

fn race_id(conn: &Connection, key: &RaceKey) -> Result<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT race_id FROM race WHERE hd = ?1 AND jcd = ?2 AND rno = ?3",
            params![key.date.to_string(), key.venue, key.race_no],
            |row| row.get(0),
        )
        .optional()?)
}

fn write_aggregate(conn: &Connection, aggregate: &RaceAggregate) -> Result<SaveReport> {
    let key = &aggregate.key;
    if !venue_exists(conn, &key.venue)? {
        bail!("Unknown venue code {}", key.venue);
    }

    for profile in &aggregate.players {
        upsert_player(conn, profile)?;
    }

    let race = &aggregate.race;
    conn.execute(
        &merge_upsert_sql(
            "race",
            &["hd", "jcd", "rno"],
            &RACE_COLUMNS,
            ", updated_at = datetime('now')",
        ),
        params![
            key.date.to_string(),
            key.venue,
            key.race_no,
            race.name,
            race.distance,
            race.deadline.map(|t| t.format("%H:%M").to_string()),
            race.stabilizer,
            race.weather.map(|w| w.as_str()),
            race.temperature,
            race.wind_speed,
            race.wind_direction.map(|w| w.as_str()),
            race.water_temperature,
            race.wave_height,
            aggregate.season.year,
            aggregate.season.term,
        ],
    )?;
    let race_id = race_id(conn, key)?.context("Race row missing after upsert")?;

    let mut report = SaveReport {
        race_id,
        ..Default::default()
    };

    let entry_sql = merge_upsert_sql("race_entry", &["race_id", "lane"], &ENTRY_COLUMNS, "");
    for lane_entry in &aggregate.entries {
        let entry = &lane_entry.entry;
        let existing: Option<u32> = conn
            .query_row(
                "SELECT player_id FROM race_entry WHERE race_id = ?1 AND lane = ?2",
                params![race_id, lane_entry.lane],
                |row| row.get(0),
            )
            .optional()?;

        let Some(player_id) = entry.player_id.or(existing) else {
            warn!(
                "Skipping {} lane {}: no player id and no stored entry",
                key, lane_entry.lane
            );
            report.entries_skipped += 1;
            report.deferred.extend(lane_entry.phases.iter().copied());
            continue;
        };
        if entry.player_id.is_some() {
            upsert_player(conn, &PlayerProfile::new(player_id))?;
        }

        write_entry(conn, &entry_sql, race_id, lane_entry.lane, player_id, entry)?;
        report.entries_written += 1;
    }

    for payout in &aggregate.payouts {
        report.payouts_inserted += conn.execute(
            r#"
            INSERT INTO payout (race_id, bet_type, combination, amount, popularity)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(race_id, bet_type, combination) DO NOTHING
            "#,
            params![
                race_id,
                payout.bet_type.as_str(),
                payout.combination,
                payout.amount,
                payout.popularity,
            ],
        )?;
    }

    for phase in aggregate.completed.difference(&report.deferred) {
        conn.execute(
            "DELETE FROM pending_phase WHERE hd = ?1 AND jcd = ?2 AND rno = ?3 AND phase = ?4",
            params![key.date.to_string(), key.venue, key.race_no, phase.as_str()],
        )?;
    }
    for phase in aggregate.pending.union(&report.deferred) {
        conn.execute(
            r#"
            INSERT INTO pending_phase (hd, jcd, rno, phase) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(hd, jcd, rno, phase) DO UPDATE SET
                attempts = pending_phase.attempts + 1,
                updated_at = datetime('now')
            "#,
            params![key.date.to_string(), key.venue, key.race_no, phase.as_str()],
        )?;
    }

    Ok(report)
}

/// Insert if absent; existing profile fields are never replaced
fn upsert_player(conn: &Connection, profile: &PlayerProfile) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO player (player_id, name, branch, hometown, birth_date)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(player_id) DO UPDATE SET
            name = COALESCE(player.name, excluded.name),
            branch = COALESCE(player.branch, excluded.branch),
            hometown = COALESCE(player.hometown, excluded.hometown),
            birth_date = COALESCE(player.birth_date, excluded.birth_date)
        "#,
        params![
            profile.player_id,
            profile.name,
            profile.branch,
            profile.hometown,
            profile.birth_date.map(|d| d.to_string()),
        ],
    )?;
    Ok(())
}

fn write_entry(
    conn: &Connection,
    sql: &str,
    race_id: i64,
    lane: u8,
    player_id: u32,
    entry: &EntryPatch,
) -> Result<()> {
    let parts_changed = entry
        .parts_changed
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        sql,
        params![
            race_id,
            lane,
            player_id,
            entry.class,
            entry.age,
            entry.weight,
            entry.f_count,
            entry.l_count,
            entry.avg_st,
            entry.national_win_rate,
            entry.national_two_rate,
            entry.national_three_rate,
            entry.local_win_rate,
            entry.local_two_rate,
            entry.local_three_rate,
            entry.motor_no,
            entry.motor_two_rate,
            entry.motor_three_rate,
            entry.boat_no,
            entry.boat_two_rate,
            entry.boat_three_rate,
            entry.body_weight,
            entry.tuning_weight,
            entry.exhibition_time,
            entry.tilt,
            entry.propeller,
            parts_changed,
            entry.exhibition_course,
            entry.exhibition_st,
            entry.rank_raw,
            entry.rank,
            entry.race_time,
            entry.start_course,
            entry.start_st,
            entry.decision.map(|d| d.as_str()),
        ],
    )?;
    Ok(())
}
