//! Error taxonomy for the harvest pipeline.
//!
//! Target-level failures carry a [`FailureClass`] so the run summary can tally
//! them for operator triage. Field-level problems never show up here; they
//! degrade to an absent value plus a [`crate::normalize::NormalizationWarning`].

use serde::Serialize;
use thiserror::Error;

use crate::crawler::PageType;
use crate::retry::{Backoff, Retryable};

/// Classified outcome of a failed fetch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Timeout, connection reset, 5xx.
    #[error("transient failure fetching {url}: {reason}")]
    Transient { url: String, reason: String },

    /// 4xx other than the throttling signal, malformed locator.
    #[error("permanent failure fetching {url}: {reason}")]
    Permanent { url: String, reason: String },

    /// Explicit throttling response from the source.
    #[error("blocked while fetching {url}: HTTP {status}")]
    Blocked { url: String, status: u16 },
}

impl FetchError {
    pub fn class(&self) -> FailureClass {
        match self {
            FetchError::Transient { .. } => FailureClass::FetchTransient,
            FetchError::Permanent { .. } => FailureClass::FetchPermanent,
            FetchError::Blocked { .. } => FailureClass::FetchBlocked,
        }
    }
}

impl Retryable for FetchError {
    fn backoff(&self) -> Backoff {
        match self {
            FetchError::Transient { .. } => Backoff::Standard,
            FetchError::Blocked { .. } => Backoff::Steep,
            FetchError::Permanent { .. } => Backoff::Never,
        }
    }
}

/// Failure to turn a raw document into raw field values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// A required anchor structure is wholly absent: the configured selector
    /// map no longer matches the source format.
    #[error("{page} page no longer matches selector map {version}: anchor '{anchor}' not found")]
    SchemaMismatch {
        page: PageType,
        version: String,
        anchor: String,
    },

    /// The page exists but carries a "no data" marker (race not held yet,
    /// cancelled, results not published).
    #[error("{page} page not published: {marker}")]
    NotPublished { page: PageType, marker: String },

    /// The selector map has no rules for this page type.
    #[error("selector map has no rules for {0} pages")]
    UnknownPage(PageType),
}

impl ExtractError {
    pub fn class(&self) -> FailureClass {
        match self {
            ExtractError::SchemaMismatch { .. } | ExtractError::UnknownPage(_) => {
                FailureClass::ExtractionSchemaMismatch
            }
            ExtractError::NotPublished { .. } => FailureClass::NotPublished,
        }
    }
}

/// Failure to load or compile a selector map.
#[derive(Debug, Error)]
pub enum SelectorMapError {
    #[error("failed to read selector map {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse selector map: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid CSS selector '{selector}' for {page}.{field}: {reason}")]
    InvalidSelector {
        page: String,
        field: String,
        selector: String,
        reason: String,
    },

    #[error("invalid pattern '{pattern}' for {page}.{field}: {source}")]
    InvalidPattern {
        page: String,
        field: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Target-level failure raised by the orchestrator.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("schedule index unavailable for {date}: {source}")]
    ScheduleUnavailable {
        date: chrono::NaiveDate,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("persistence failed: {0:#}")]
    Persistence(anyhow::Error),
}

impl HarvestError {
    pub fn class(&self) -> FailureClass {
        match self {
            HarvestError::ScheduleUnavailable { .. } => FailureClass::ScheduleUnavailable,
            HarvestError::Fetch(e) => e.class(),
            HarvestError::Extract(e) => e.class(),
            HarvestError::Persistence(_) => FailureClass::Persistence,
        }
    }
}

/// Failure classification used for run-summary tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    ScheduleUnavailable,
    FetchTransient,
    FetchPermanent,
    FetchBlocked,
    ExtractionSchemaMismatch,
    NotPublished,
    Persistence,
}

impl std::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureClass::ScheduleUnavailable => "schedule_unavailable",
            FailureClass::FetchTransient => "fetch_transient",
            FailureClass::FetchPermanent => "fetch_permanent",
            FailureClass::FetchBlocked => "fetch_blocked",
            FailureClass::ExtractionSchemaMismatch => "extraction_schema_mismatch",
            FailureClass::NotPublished => "not_published",
            FailureClass::Persistence => "persistence",
        };
        f.write_str(name)
    }
}
