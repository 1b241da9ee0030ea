//! Biannual season key (year, term).
//!
//! Term 1 covers April to September, term 2 the rest of the year. The
//! convention decides which year January to March belongs to.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// How January to March dates are assigned a season year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonConvention {
    /// Season year is the calendar year of the race date
    #[default]
    CalendarYear,
    /// January to March belongs to term 2 of the previous year, so that
    /// term 2 of year Y spans Oct Y to Mar Y+1
    FiscalYear,
}

/// Season period key shared with the biannual summary data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Season {
    pub year: i32,
    pub term: u8,
}

impl Season {
    /// Season of a race date
    pub fn of(date: NaiveDate, convention: SeasonConvention) -> Self {
        let month = date.month();
        let term = if (4..=9).contains(&month) { 1 } else { 2 };
        let year = match convention {
            SeasonConvention::CalendarYear => date.year(),
            SeasonConvention::FiscalYear if month <= 3 => date.year() - 1,
            SeasonConvention::FiscalYear => date.year(),
        };
        Self { year, term }
    }
}
