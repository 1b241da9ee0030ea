//! Selector map: declarative field-location rules per page type.
//!
//! A map is plain JSON data, loaded once and compiled into an [`Extractor`].
//! The built-in map for boatrace.jp ships with the crate; a different file can
//! be swapped in through configuration without touching code.

pub mod extractor;

pub use extractor::{ExtractContext, Extractor};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::crawler::PageType;
use crate::error::SelectorMapError;

/// Selector map bundled with the crate
pub const BUILTIN_MAP: &str = include_str!("../../config/selector_map.json");

/// Versioned set of extraction rules, keyed by page type
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorMap {
    pub version: String,
    pub pages: BTreeMap<PageType, PageRules>,
}

/// Rules for one page type
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageRules {
    /// Structures that must exist on every well-formed page
    pub anchors: Vec<String>,
    /// Markers of a page that exists but carries no data yet
    pub unavailable: Vec<UnavailableMarker>,
    /// Document-level fields
    pub fields: BTreeMap<String, FieldRule>,
    /// Repeating row groups (one record per matched row)
    pub groups: BTreeMap<String, GroupRule>,
}

/// "No data" marker: an element, a text, or text inside an element
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UnavailableMarker {
    pub selector: Option<String>,
    pub text: Option<String>,
}

/// Repeating structure such as one table body per lane
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRule {
    pub selector: String,
    /// Rows without a match for this selector are skipped
    #[serde(default)]
    pub require: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Fields whose last seen value fills later rows that lack one
    #[serde(default)]
    pub carry_forward: Vec<String>,
    pub fields: BTreeMap<String, FieldRule>,
}

/// Location of one field plus its post-processing hint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldRule {
    /// CSS selector relative to the scope; the scope itself when unset.
    /// May contain `{race_no}` or `{race_no_plus_1}`.
    #[serde(default)]
    pub selector: Option<String>,
    /// Which match to use when the selector matches several elements
    #[serde(default)]
    pub nth: usize,
    #[serde(default)]
    pub extract: Extract,
}

/// Post-processing applied to the located element
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extract {
    /// Whole trimmed text
    #[default]
    Text,
    /// One line of a multi-line cell (0-based)
    Line { line: usize },
    /// Token after splitting the text (or one line of it) on a separator
    Token {
        #[serde(default)]
        line: Option<usize>,
        separator: String,
        index: usize,
    },
    /// First capture group of a regex (whole match without groups)
    Pattern {
        pattern: String,
        #[serde(default)]
        line: Option<usize>,
    },
    /// "true" when the selector matches, "false" otherwise
    Present,
    /// "true" when the element carries the class
    HasClass { class: String },
    /// Numeric suffix of a class such as `is-boatColor3`
    MarkerClass { prefix: String },
    /// Attribute value, optionally narrowed by a regex
    Attr {
        name: String,
        #[serde(default)]
        pattern: Option<String>,
    },
    /// Texts of every match joined by a separator
    JoinAll { separator: String },
    /// 1-based row index within the group
    Position,
}

impl SelectorMap {
    pub fn from_json(json: &str) -> Result<Self, SelectorMapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SelectorMapError> {
        let content = std::fs::read_to_string(path).map_err(|source| SelectorMapError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn builtin() -> Result<Self, SelectorMapError> {
        Self::from_json(BUILTIN_MAP)
    }
}

/// Raw field values: absent fields map to `None`
pub type RawRecord = BTreeMap<String, Option<String>>;

/// Everything extracted from one document
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub page: PageType,
    pub fields: RawRecord,
    pub groups: BTreeMap<String, Vec<RawRecord>>,
}

impl RawPage {
    pub fn field(&self, name: &str) -> Option<&str> {
        raw(&self.fields, name)
    }

    pub fn group(&self, name: &str) -> &[RawRecord] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Value of `name` in a raw record
pub fn raw<'a>(record: &'a RawRecord, name: &str) -> Option<&'a str> {
    record.get(name).and_then(|v| v.as_deref())
}
