//! HTML rendering of match reports.

use std::sync::LazyLock;

use regex::Regex;
use sar_config::RenderSettings;

use crate::{MatchReport, escape};

/// A complete hyperlink snippet. Snippets containing one are shown unstyled.
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a href="[^"]*">.*?</a>"#).expect("anchor pattern should compile")
});

/// Renders match reports as HTML blocks.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    /// Snippet separator and related settings.
    settings: RenderSettings,
}

impl Renderer {
    /// Creates a renderer with the given settings.
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    /// Wraps every occurrence of `search` in `<strong>`, unless the snippet is a link.
    ///
    /// Only text between tags is searched. Entities match as the character they stand
    /// for and are never split.
    pub fn emphasize(&self, snippet: &str, search: &str) -> String {
        if search.is_empty() || ANCHOR.is_match(snippet) {
            return snippet.to_string();
        }

        let mut out = String::with_capacity(snippet.len());
        let mut rest = snippet;
        while let Some(open) = rest.find('<') {
            let Some(close) = rest[open..].find('>').map(|len| open + len) else {
                break;
            };
            out.push_str(&emphasize_text(&rest[..open], search));
            out.push_str(&rest[open..=close]);
            rest = &rest[close + 1..];
        }
        out.push_str(&emphasize_text(rest, search));
        out
    }

    /// Renders one field's block:
    /// `<i>Found in field "F"</i> : SUMMARY <br><br>S1...S2 <br><br>`.
    pub fn render_report(&self, report: &MatchReport, search: &str) -> String {
        let snippets: Vec<String> = report
            .snippets
            .iter()
            .map(|snippet| self.emphasize(snippet, search))
            .collect();
        format!(
            "<i>Found in field \"{}\"</i> : {} <br><br>{} <br><br>",
            report.field,
            report.summary,
            snippets.join(&self.settings.separator)
        )
    }

    /// Concatenates the blocks of several reports.
    pub fn render_all<'a, I>(&self, reports: I, search: &str) -> String
    where
        I: IntoIterator<Item = &'a MatchReport>,
    {
        reports
            .into_iter()
            .map(|report| self.render_report(report, search))
            .collect()
    }
}

/// Bolds `search` inside a run of escaped text that holds no tags.
fn emphasize_text(run: &str, search: &str) -> String {
    let units = escape::decode_offsets(run);
    let mut decoded = String::with_capacity(run.len());
    // decoded byte offset -> source byte offset, one entry per unit plus the end
    let mut offsets = Vec::with_capacity(units.len() + 1);
    for &(at, ch) in &units {
        offsets.push((decoded.len(), at));
        decoded.push(ch);
    }
    offsets.push((decoded.len(), run.len()));

    let source = |decoded_at: usize| {
        offsets
            .binary_search_by_key(&decoded_at, |&(d, _)| d)
            .ok()
            .map(|i| offsets[i].1)
    };

    let mut out = String::with_capacity(run.len());
    let mut copied = 0;
    for (at, found) in decoded.match_indices(search) {
        let (Some(start), Some(end)) = (source(at), source(at + found.len())) else {
            continue;
        };
        out.push_str(&run[copied..start]);
        out.push_str("<strong>");
        out.push_str(&run[start..end]);
        out.push_str("</strong>");
        copied = end;
    }
    out.push_str(&run[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::summary_line;

    fn report(field: &str, snippets: &[&str]) -> MatchReport {
        MatchReport {
            field: field.into(),
            occurrence_count: snippets.len(),
            summary: summary_line(snippets.len()),
            snippets: snippets.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn bolds_every_occurrence() {
        let renderer = Renderer::default();
        assert_eq!(
            renderer.emphasize("<p>cat and cat</p>", "cat"),
            "<p><strong>cat</strong> and <strong>cat</strong></p>"
        );
    }

    #[test]
    fn links_are_not_bolded() {
        let renderer = Renderer::default();
        let link = r#"<a href="http://x/cat">cat</a>"#;
        assert_eq!(renderer.emphasize(link, "cat"), link);
    }

    #[test]
    fn entities_are_not_split() {
        let renderer = Renderer::default();
        assert_eq!(
            renderer.emphasize("<p>fish &amp; amp chips</p>", "amp"),
            "<p>fish &amp; <strong>amp</strong> chips</p>"
        );
    }

    #[test]
    fn tag_names_are_not_bolded() {
        let renderer = Renderer::default();
        assert_eq!(
            renderer.emphasize("<p>a p here</p>", "p"),
            "<p>a <strong>p</strong> here</p>"
        );
    }

    #[test]
    fn search_matches_escaped_characters() {
        let renderer = Renderer::default();
        assert_eq!(
            renderer.emphasize("<li>fish &amp; chips</li>", "fish & chips"),
            "<li><strong>fish &amp; chips</strong></li>"
        );
    }

    #[test]
    fn unclosed_tag_is_text() {
        let renderer = Renderer::default();
        assert_eq!(renderer.emphasize("a < cat", "cat"), "a < <strong>cat</strong>");
    }

    #[test]
    fn block_format() {
        let renderer = Renderer::default();
        let html = renderer.render_report(&report("body", &["<p>cat</p>", "<li>cat</li>"]), "cat");
        assert_eq!(
            html,
            "<i>Found in field \"body\"</i> : 2 matches. <br><br>\
             <p><strong>cat</strong></p>...<li><strong>cat</strong></li> <br><br>"
        );
    }

    #[test]
    fn custom_separator() {
        let renderer = Renderer::new(RenderSettings {
            separator: " | ".into(),
        });
        let html = renderer.render_report(&report("body", &["a", "b"]), "x");
        assert!(html.contains("a | b"));
    }

    #[test]
    fn render_all_concatenates() {
        let renderer = Renderer::default();
        let reports = [report("title", &["cat"]), report("body", &["cat"])];
        let html = renderer.render_all(&reports, "cat");
        let title_at = html.find("\"title\"").unwrap();
        let body_at = html.find("\"body\"").unwrap();
        assert!(title_at < body_at);
        assert_eq!(html.matches("<br><br>").count(), 4);
    }
}
