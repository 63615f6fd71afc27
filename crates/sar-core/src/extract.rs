//! Match extraction.
//!
//! Counts literal occurrences of a search string in a field and collects HTML snippets
//! showing where they are. Short fields (and verbatim fields such as `title`) are
//! returned whole. Long fields are parsed as HTML and searched element by element:
//! hyperlinks first, then the remaining text of each context element.
//!
//! Element snippets are never truncated, even when an element is far longer than the
//! short-field limit.

use std::collections::BTreeMap;

use sar_config::ExtractSettings;
use sar_markup::{MarkupError, MarkupTree};
use serde::Serialize;
use tracing::{trace, warn};

use crate::{SarError, escape};

/// Matches of a search string within one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    /// Field name.
    pub field: String,
    /// Number of literal, non-overlapping occurrences in the raw field text.
    pub occurrence_count: usize,
    /// `"1 match."` or `"N matches."`.
    pub summary: String,
    /// Context snippets, in extraction order.
    pub snippets: Vec<String>,
}

impl MatchReport {
    /// Returns the summary followed by every snippet.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.snippets.len() + 1);
        lines.push(self.summary.clone());
        lines.extend(self.snippets.iter().cloned());
        lines
    }
}

/// Returns the summary line for `count` occurrences.
pub fn summary_line(count: usize) -> String {
    if count == 1 {
        format!("{count} match.")
    } else {
        format!("{count} matches.")
    }
}

/// Counts literal, case-sensitive, non-overlapping occurrences of `search` in `text`.
///
/// An empty search string occurs nowhere.
pub fn count_occurrences(text: &str, search: &str) -> usize {
    if search.is_empty() {
        return 0;
    }
    text.matches(search).count()
}

/// Extracts match reports from field text.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    /// Fast-path limit, verbatim fields and context tags.
    settings: ExtractSettings,
}

impl Extractor {
    /// Creates an extractor with the given settings.
    pub fn new(settings: ExtractSettings) -> Self {
        Self { settings }
    }

    /// Returns the extractor's settings.
    pub fn settings(&self) -> &ExtractSettings {
        &self.settings
    }

    /// Returns the summary and snippets for one field, or an empty vector when the
    /// search string is empty or absent from the field.
    pub fn extract(&self, field: &str, value: &str, search: &str) -> Result<Vec<String>, MarkupError> {
        Ok(self
            .find_matches(field, value, search)?
            .map(|report| report.lines())
            .unwrap_or_default())
    }

    /// Builds the match report for one field.
    ///
    /// Returns `Ok(None)` when the search string is empty or does not occur.
    pub fn find_matches(
        &self,
        field: &str,
        value: &str,
        search: &str,
    ) -> Result<Option<MatchReport>, MarkupError> {
        let count = count_occurrences(value, search);
        if count == 0 {
            return Ok(None);
        }

        let snippets =
            if self.settings.is_verbatim(field) || value.len() <= self.settings.short_field_limit {
                trace!(field, len = value.len(), "reporting field verbatim");
                vec![value.to_string()]
            } else {
                self.context_snippets(value, search)?
            };

        Ok(Some(MatchReport {
            field: field.to_string(),
            occurrence_count: count,
            summary: summary_line(count),
            snippets,
        }))
    }

    /// Extracts reports for every field of a `name -> text` map.
    ///
    /// Fields without a match are absent from the result. A field whose markup cannot
    /// be parsed gets an error entry; its siblings are unaffected.
    pub fn extract_matches(
        &self,
        fields: &BTreeMap<String, String>,
        search: &str,
    ) -> BTreeMap<String, Result<MatchReport, SarError>> {
        let mut reports = BTreeMap::new();
        for (name, value) in fields {
            match self.find_matches(name, value, search) {
                Ok(Some(report)) => {
                    reports.insert(name.clone(), Ok(report));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(field = %name, error = %e, "skipping field with unparseable markup");
                    reports.insert(name.clone(), Err(SarError::from(e)));
                }
            }
        }
        reports
    }

    /// Parses a long field and collects snippets for every context tag, in tag order.
    fn context_snippets(&self, value: &str, search: &str) -> Result<Vec<String>, MarkupError> {
        let mut tree = sar_markup::parse(&normalize_lines(value))?;
        let mut snippets = Vec::new();
        for tag in &self.settings.tags {
            let found = tag_snippets(&mut tree, tag, search);
            trace!(tag = %tag, found = found.len(), "searched context elements");
            snippets.extend(found);
        }
        Ok(snippets)
    }
}

/// Collects snippets for every element with `tag`, last element first.
///
/// Matching hyperlinks inside an element are reported on their own and detached, so
/// their text does not count toward the element's own match. Element ids are gathered
/// up front; detaching never invalidates them.
fn tag_snippets(tree: &mut MarkupTree, tag: &str, search: &str) -> Vec<String> {
    let mut found = Vec::new();

    for element in tree.find_by_tag(tag).into_iter().rev() {
        for link in tree.links_within(element) {
            let href = tree.attr(link, "href").unwrap_or_default().to_string();
            let text = tree.text_content(link);
            if text.contains(search) || href.contains(search) {
                found.push(anchor_snippet(&href, &text));
                tree.detach(link);
            }
        }

        let text = tree.text_content(element);
        if text.contains(search) {
            found.push(format!("<{tag}>{}</{tag}>", escape::text(&text)));
        }
    }

    found
}

/// Formats a hyperlink snippet.
fn anchor_snippet(href: &str, text: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        escape::attribute(href),
        escape::text(text)
    )
}

/// Strips leading and trailing whitespace from every line and joins the lines.
///
/// HTML structure, not line breaks, decides what the snippets look like.
fn normalize_lines(value: &str) -> String {
    value
        .split('\n')
        .map(|line| line.trim_matches(|c: char| c.is_ascii_whitespace()))
        .flat_map(|line| line.chars().filter(|&c| c != '\r'))
        .collect()
}
