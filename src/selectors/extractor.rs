//! Rule interpreter: applies a compiled selector map to a raw document.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::{Extract, FieldRule, GroupRule, PageRules, RawPage, RawRecord, SelectorMap};
use crate::crawler::PageType;
use crate::error::{ExtractError, SelectorMapError};

/// Values substituted into templated selectors
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractContext {
    pub race_no: Option<u8>,
}

impl ExtractContext {
    pub fn race(race_no: u8) -> Self {
        Self {
            race_no: Some(race_no),
        }
    }
}

enum Locate {
    Scope,
    Static(Selector),
    Templated(String),
}

enum Op {
    Text,
    Line(usize),
    Token {
        line: Option<usize>,
        separator: String,
        index: usize,
    },
    Pattern {
        regex: Regex,
        line: Option<usize>,
    },
    Present,
    HasClass(String),
    MarkerClass(String),
    Attr {
        name: String,
        pattern: Option<Regex>,
    },
    JoinAll(String),
    Position,
}

struct CompiledField {
    name: String,
    locate: Locate,
    nth: usize,
    op: Op,
}

struct CompiledGroup {
    name: String,
    selector: Selector,
    require: Option<Selector>,
    limit: Option<usize>,
    carry_forward: Vec<String>,
    fields: Vec<CompiledField>,
}

struct CompiledMarker {
    selector: Option<Selector>,
    text: Option<String>,
}

struct CompiledPage {
    anchors: Vec<(String, Selector)>,
    unavailable: Vec<CompiledMarker>,
    fields: Vec<CompiledField>,
    groups: Vec<CompiledGroup>,
}

/// Compiled selector map
pub struct Extractor {
    version: String,
    pages: BTreeMap<PageType, CompiledPage>,
}

impl Extractor {
    /// Compile a selector map, validating every selector and pattern
    pub fn new(map: SelectorMap) -> Result<Self, SelectorMapError> {
        let mut pages = BTreeMap::new();
        for (page, rules) in map.pages {
            pages.insert(page, compile_page(page, rules)?);
        }
        Ok(Self {
            version: map.version,
            pages,
        })
    }

    /// Load the map at `path`, or the built-in map when unset
    pub fn load(path: Option<&Path>) -> Result<Self, SelectorMapError> {
        let map = match path {
            Some(p) => SelectorMap::from_file(p)?,
            None => SelectorMap::builtin()?,
        };
        let extractor = Self::new(map)?;
        info!(
            "Loaded selector map {} ({} page types)",
            extractor.version,
            extractor.pages.len()
        );
        Ok(extractor)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Extract raw field values from a document
    pub fn extract(
        &self,
        page: PageType,
        html: &str,
        ctx: &ExtractContext,
    ) -> Result<RawPage, ExtractError> {
        let rules = self.pages.get(&page).ok_or(ExtractError::UnknownPage(page))?;
        let document = Html::parse_document(html);

        if let Some(marker) = find_unavailable(&document, &rules.unavailable) {
            return Err(ExtractError::NotPublished { page, marker });
        }

        for (anchor, selector) in &rules.anchors {
            if document.select(selector).next().is_none() {
                return Err(ExtractError::SchemaMismatch {
                    page,
                    version: self.version.clone(),
                    anchor: anchor.clone(),
                });
            }
        }

        let root = document.root_element();
        let fields = rules
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.evaluate(root, ctx, 0)))
            .collect();

        let mut groups = BTreeMap::new();
        for group in &rules.groups {
            let rows = group.evaluate(root, ctx);
            debug!("{} {}: {} rows", page, group.name, rows.len());
            groups.insert(group.name.clone(), rows);
        }

        Ok(RawPage {
            page,
            fields,
            groups,
        })
    }
}

fn find_unavailable(document: &Html, markers: &[CompiledMarker]) -> Option<String> {
    let mut page_text: Option<String> = None;
    for marker in markers {
        match (&marker.selector, &marker.text) {
            (Some(selector), text) => {
                for el in document.select(selector) {
                    let content = element_text(el);
                    match text {
                        Some(t) if !content.contains(t.as_str()) => continue,
                        _ => return Some(text.clone().unwrap_or(content)),
                    }
                }
            }
            (None, Some(text)) => {
                let haystack = page_text
                    .get_or_insert_with(|| document.root_element().text().collect::<String>());
                if haystack.contains(text.as_str()) {
                    return Some(text.clone());
                }
            }
            (None, None) => {}
        }
    }
    None
}

impl CompiledGroup {
    fn evaluate(&self, root: ElementRef<'_>, ctx: &ExtractContext) -> Vec<RawRecord> {
        let mut rows = Vec::new();
        let mut carried: BTreeMap<&str, String> = BTreeMap::new();

        for el in root.select(&self.selector) {
            if let Some(require) = &self.require {
                if el.select(require).next().is_none() {
                    continue;
                }
            }

            let position = rows.len() + 1;
            let mut record: RawRecord = self
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.evaluate(el, ctx, position)))
                .collect();

            for name in &self.carry_forward {
                match record.get(name).cloned().flatten() {
                    Some(value) => {
                        carried.insert(name, value);
                    }
                    None => {
                        if let Some(value) = carried.get(name.as_str()) {
                            record.insert(name.clone(), Some(value.clone()));
                        }
                    }
                }
            }

            rows.push(record);
            if self.limit.is_some_and(|limit| rows.len() >= limit) {
                break;
            }
        }
        rows
    }
}

impl CompiledField {
    fn selector<'a>(&'a self, ctx: &ExtractContext) -> Option<Cow<'a, Selector>> {
        match &self.locate {
            Locate::Scope => None,
            Locate::Static(selector) => Some(Cow::Borrowed(selector)),
            Locate::Templated(template) => {
                let rendered = render(template, ctx)?;
                let parsed = Selector::parse(&rendered).map_err(|e| format!("{e:?}"));
                match parsed {
                    Ok(selector) => Some(Cow::Owned(selector)),
                    Err(e) => {
                        debug!("Templated selector '{}' failed: {}", rendered, e);
                        None
                    }
                }
            }
        }
    }

    fn evaluate(&self, scope: ElementRef<'_>, ctx: &ExtractContext, position: usize) -> Option<String> {
        if let Op::Position = self.op {
            return (position > 0).then(|| position.to_string());
        }

        let selector = self.selector(ctx);
        if matches!(self.locate, Locate::Templated(_)) && selector.is_none() {
            return None;
        }

        match &self.op {
            Op::Present => {
                let found = match &selector {
                    Some(s) => scope.select(s).next().is_some(),
                    None => true,
                };
                return Some(found.to_string());
            }
            Op::JoinAll(separator) => {
                let parts: Vec<String> = match &selector {
                    Some(s) => scope
                        .select(s)
                        .map(element_text)
                        .filter(|t| !t.is_empty())
                        .collect(),
                    None => lines(scope),
                };
                return (!parts.is_empty()).then(|| parts.join(separator));
            }
            _ => {}
        }

        let el = match &selector {
            Some(s) => scope.select(s).nth(self.nth)?,
            None => scope,
        };

        match &self.op {
            Op::Text => non_empty(element_text(el)),
            Op::Line(n) => lines(el).into_iter().nth(*n),
            Op::Token {
                line,
                separator,
                index,
            } => {
                let base = text_or_line(el, *line)?;
                base.split(separator.as_str())
                    .map(str::trim)
                    .nth(*index)
                    .and_then(|t| non_empty(t.to_string()))
            }
            Op::Pattern { regex, line } => {
                let base = text_or_line(el, *line)?;
                capture(regex, &base)
            }
            Op::HasClass(class) => Some(el.value().classes().any(|c| c == class).to_string()),
            Op::MarkerClass(prefix) => el.value().classes().find_map(|c| {
                c.strip_prefix(prefix.as_str())
                    .filter(|rest| !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_digit()))
                    .map(str::to_string)
            }),
            Op::Attr { name, pattern } => {
                let value = el.value().attr(name)?;
                match pattern {
                    Some(regex) => capture(regex, value),
                    None => non_empty(value.trim().to_string()),
                }
            }
            Op::Present | Op::JoinAll(_) | Op::Position => None,
        }
    }
}

fn render(template: &str, ctx: &ExtractContext) -> Option<String> {
    let mut out = template.to_string();
    if out.contains("{race_no_plus_1}") {
        out = out.replace("{race_no_plus_1}", &(ctx.race_no? as u16 + 1).to_string());
    }
    if out.contains("{race_no}") {
        out = out.replace("{race_no}", &ctx.race_no?.to_string());
    }
    Some(out)
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text nodes of an element, trimmed; `<br>`-separated cells yield one per line
fn lines(el: ElementRef<'_>) -> Vec<String> {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn text_or_line(el: ElementRef<'_>, line: Option<usize>) -> Option<String> {
    match line {
        Some(n) => lines(el).into_iter().nth(n),
        None => non_empty(element_text(el)),
    }
}

fn capture(regex: &Regex, text: &str) -> Option<String> {
    let caps = regex.captures(text)?;
    let m = caps.get(1).or_else(|| caps.get(0))?;
    non_empty(m.as_str().trim().to_string())
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

// ==================== Compilation ====================

fn compile_page(page: PageType, rules: PageRules) -> Result<CompiledPage, SelectorMapError> {
    let page_name = page.as_str();

    let anchors = rules
        .anchors
        .into_iter()
        .map(|a| {
            let selector = parse_selector(page_name, "anchors", &a)?;
            Ok((a, selector))
        })
        .collect::<Result<Vec<_>, SelectorMapError>>()?;

    let unavailable = rules
        .unavailable
        .into_iter()
        .map(|m| {
            let selector = m
                .selector
                .as_deref()
                .map(|s| parse_selector(page_name, "unavailable", s))
                .transpose()?;
            Ok(CompiledMarker {
                selector,
                text: m.text,
            })
        })
        .collect::<Result<Vec<_>, SelectorMapError>>()?;

    let fields = compile_fields(page_name, rules.fields)?;

    let groups = rules
        .groups
        .into_iter()
        .map(|(name, group)| compile_group(page_name, name, group))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledPage {
        anchors,
        unavailable,
        fields,
        groups,
    })
}

fn compile_group(page: &str, name: String, group: GroupRule) -> Result<CompiledGroup, SelectorMapError> {
    let selector = parse_selector(page, &name, &group.selector)?;
    let require = group
        .require
        .as_deref()
        .map(|s| parse_selector(page, &name, s))
        .transpose()?;
    let fields = compile_fields(page, group.fields)?;
    Ok(CompiledGroup {
        name,
        selector,
        require,
        limit: group.limit,
        carry_forward: group.carry_forward,
        fields,
    })
}

fn compile_fields(
    page: &str,
    fields: BTreeMap<String, FieldRule>,
) -> Result<Vec<CompiledField>, SelectorMapError> {
    fields
        .into_iter()
        .map(|(name, rule)| compile_field(page, name, rule))
        .collect()
}

fn compile_field(page: &str, name: String, rule: FieldRule) -> Result<CompiledField, SelectorMapError> {
    let locate = match rule.selector {
        None => Locate::Scope,
        Some(s) if s.contains('{') => {
            // Validate with a representative race number
            let probe = render(&s, &ExtractContext::race(1)).unwrap_or_else(|| s.clone());
            parse_selector(page, &name, &probe)?;
            Locate::Templated(s)
        }
        Some(s) => Locate::Static(parse_selector(page, &name, &s)?),
    };

    let op = match rule.extract {
        Extract::Text => Op::Text,
        Extract::Line { line } => Op::Line(line),
        Extract::Token {
            line,
            separator,
            index,
        } => Op::Token {
            line,
            separator,
            index,
        },
        Extract::Pattern { pattern, line } => Op::Pattern {
            regex: parse_pattern(page, &name, &pattern)?,
            line,
        },
        Extract::Present => Op::Present,
        Extract::HasClass { class } => Op::HasClass(class),
        Extract::MarkerClass { prefix } => Op::MarkerClass(prefix),
        Extract::Attr { name: attr, pattern } => Op::Attr {
            pattern: pattern
                .as_deref()
                .map(|p| parse_pattern(page, &name, p))
                .transpose()?,
            name: attr,
        },
        Extract::JoinAll { separator } => Op::JoinAll(separator),
        Extract::Position => Op::Position,
    };

    Ok(CompiledField {
        name,
        locate,
        nth: rule.nth,
        op,
    })
}

fn parse_selector(page: &str, field: &str, selector: &str) -> Result<Selector, SelectorMapError> {
    Selector::parse(selector).map_err(|e| SelectorMapError::InvalidSelector {
        page: page.to_string(),
        field: field.to_string(),
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

fn parse_pattern(page: &str, field: &str, pattern: &str) -> Result<Regex, SelectorMapError> {
    Regex::new(pattern).map_err(|source| SelectorMapError::InvalidPattern {
        page: page.to_string(),
        field: field.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}
