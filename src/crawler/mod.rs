//! Document retrieval for boatrace.jp race pages.
//!
//! Provides page locators, the shared crawl-rate gate and the fetcher.

pub mod fetcher;
pub mod rate_limiter;

pub use fetcher::{Fetcher, HttpTransport, Transport, TransportError, TransportResponse};
pub use rate_limiter::RateLimiter;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::RaceKey;

/// Page types consumed by the harvester
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    ScheduleIndex,
    EntryList,
    PreRace,
    Result,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::ScheduleIndex => "schedule_index",
            PageType::EntryList => "entry_list",
            PageType::PreRace => "pre_race",
            PageType::Result => "result",
        }
    }

    /// Path segment of the page on the source site
    fn path(&self) -> &'static str {
        match self {
            PageType::ScheduleIndex => "index",
            PageType::EntryList => "racelist",
            PageType::PreRace => "beforeinfo",
            PageType::Result => "raceresult",
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "schedule_index" => Ok(PageType::ScheduleIndex),
            "entry_list" => Ok(PageType::EntryList),
            "pre_race" => Ok(PageType::PreRace),
            "result" => Ok(PageType::Result),
            other => Err(format!("unknown page type: {}", other)),
        }
    }
}

/// Builds document locators relative to a base URL
#[derive(Debug, Clone)]
pub struct Locator {
    base_url: String,
}

impl Locator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build schedule index URL for a date
    /// URL: {base}/index?hd=YYYYMMDD
    pub fn schedule_index(&self, date: NaiveDate) -> String {
        format!(
            "{}/{}?hd={}",
            self.base_url,
            PageType::ScheduleIndex.path(),
            date.format("%Y%m%d")
        )
    }

    /// Build a race page URL
    /// URL: {base}/{racelist|beforeinfo|raceresult}?hd=YYYYMMDD&jcd=NN&rno=N
    pub fn race_page(&self, page: PageType, key: &RaceKey) -> String {
        format!(
            "{}/{}?hd={}&jcd={}&rno={}",
            self.base_url,
            page.path(),
            key.date.format("%Y%m%d"),
            key.venue,
            key.race_no
        )
    }
}
