//! SQLite schema definitions for harvested race data
//!
//! Tables:
//! - venue: Venue reference data (provisioned externally)
//! - player: Player profiles
//! - race: Race header keyed by (hd, jcd, rno) with the season key
//! - race_entry: One row per (race, lane), merged across phases
//! - payout: Payouts per (race, bet type, combination)
//! - pending_phase: Phases still to be retried for a persisted race

use rusqlite::{Connection, Result};

/// Create all tables in the database
pub fn create_tables(conn: &Connection) -> Result<()> {
    // Venue reference data
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS venue (
            jcd TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            pref TEXT
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS player (
            player_id INTEGER PRIMARY KEY,
            name TEXT,
            branch TEXT,
            hometown TEXT,
            birth_date TEXT,
            created_at TEXT DEFAULT (datetime('now'))
        )
        "#,
        [],
    )?;

    // Race header, natural key (hd, jcd, rno)
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS race (
            race_id INTEGER PRIMARY KEY AUTOINCREMENT,
            hd TEXT NOT NULL,
            jcd TEXT NOT NULL REFERENCES venue(jcd),
            rno INTEGER NOT NULL,
            race_name TEXT,
            distance INTEGER,
            deadline TEXT,
            stabilizer INTEGER,
            weather TEXT,
            temperature REAL,
            wind_speed REAL,
            wind_dir TEXT,
            water_temp REAL,
            wave_height REAL,
            season_year INTEGER NOT NULL,
            season_term INTEGER NOT NULL,
            updated_at TEXT DEFAULT (datetime('now')),
            UNIQUE(hd, jcd, rno)
        )
        "#,
        [],
    )?;

    // Entry list + pre-race + result attributes per lane
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS race_entry (
            entry_id INTEGER PRIMARY KEY AUTOINCREMENT,
            race_id INTEGER NOT NULL REFERENCES race(race_id),
            lane INTEGER NOT NULL,
            player_id INTEGER NOT NULL REFERENCES player(player_id),
            class TEXT,
            age INTEGER,
            weight REAL,
            f_count INTEGER,
            l_count INTEGER,
            avg_st REAL,
            nationwide_win_rate REAL,
            nationwide_two_win_rate REAL,
            nationwide_three_win_rate REAL,
            local_win_rate REAL,
            local_two_win_rate REAL,
            local_three_win_rate REAL,
            motor_no INTEGER,
            motor_two_win_rate REAL,
            motor_three_win_rate REAL,
            boat_no INTEGER,
            boat_two_win_rate REAL,
            boat_three_win_rate REAL,
            body_weight REAL,
            tuning_weight REAL,
            exhibition_time REAL,
            tilt REAL,
            propeller TEXT,
            parts_changed TEXT,
            exhibition_course INTEGER,
            exhibition_st REAL,
            rank_raw TEXT,
            rank INTEGER CHECK (rank BETWEEN 1 AND 6),
            race_time REAL,
            start_course INTEGER,
            start_st REAL,
            decision TEXT,
            UNIQUE(race_id, lane)
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS payout (
            payout_id INTEGER PRIMARY KEY AUTOINCREMENT,
            race_id INTEGER NOT NULL REFERENCES race(race_id),
            bet_type TEXT NOT NULL,
            combination TEXT NOT NULL,
            amount INTEGER NOT NULL,
            popularity INTEGER,
            UNIQUE(race_id, bet_type, combination)
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS pending_phase (
            hd TEXT NOT NULL,
            jcd TEXT NOT NULL,
            rno INTEGER NOT NULL,
            phase TEXT NOT NULL,
            attempts INTEGER NOT NULL DEFAULT 1,
            updated_at TEXT DEFAULT (datetime('now')),
            PRIMARY KEY (hd, jcd, rno, phase)
        )
        "#,
        [],
    )?;

    // Create indexes for common queries
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_race_hd_jcd ON race(hd, jcd)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_race_season ON race(season_year, season_term)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entry_player ON race_entry(player_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_payout_race ON payout(race_id)",
        [],
    )?;

    Ok(())
}
