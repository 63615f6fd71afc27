//! End-to-end behavior of extraction, rendering and replacement.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::collections::BTreeMap;

use sar_config::Config;
use sar_core::{
    CARDINALITY_UNLIMITED, ContentItem, FieldDescriptor, Renderer, ReplaceContext, SarError,
    SearchReplace, extract_matches, replace, replace_in_fields,
};

fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// A body long enough to take the element-by-element path.
fn long_body(html: &str) -> String {
    format!("{html}<p>{}</p>", "lorem ipsum dolor ".repeat(20))
}

#[test]
fn test_single_occurrence_summary() {
    let reports = extract_matches(&fields(&[("body", "a needle")]), "needle");
    assert_eq!(reports["body"].as_ref().unwrap().summary, "1 match.");
}

#[test]
fn test_short_and_title_fields_are_verbatim() {
    let title = format!("needle {}", "x".repeat(400));
    let reports = extract_matches(
        &fields(&[("title", &title), ("body", "short needle")]),
        "needle",
    );
    assert_eq!(
        reports["title"].as_ref().unwrap().lines(),
        vec!["1 match.".to_string(), title]
    );
    assert_eq!(
        reports["body"].as_ref().unwrap().lines(),
        vec!["1 match.", "short needle"]
    );
}

#[test]
fn test_link_snippet_without_duplicate_paragraph() {
    let body = long_body(r#"<p>click <a href="http://x/y">find me</a> please</p>"#);
    let reports = extract_matches(&fields(&[("body", &body)]), "find me");
    assert_eq!(
        reports["body"].as_ref().unwrap().snippets,
        vec![r#"<a href="http://x/y">find me</a>"#]
    );
}

#[test]
fn test_repeated_word_in_short_paragraph() {
    let reports = extract_matches(&fields(&[("body", "<p>alpha beta alpha</p>")]), "alpha");
    let report = reports["body"].as_ref().unwrap();
    assert_eq!(report.occurrence_count, 2);
    assert_eq!(report.lines(), vec!["2 matches.", "<p>alpha beta alpha</p>"]);
}

#[test]
fn test_emphasis_keeps_escaped_markup_whole() {
    let body = long_body("<p>fish &amp; amp chips</p>");
    let reports = extract_matches(&fields(&[("body", &body)]), "amp");
    let report = reports["body"].as_ref().unwrap();
    assert_eq!(report.snippets, vec!["<p>fish &amp; amp chips</p>"]);

    let html = Renderer::default().render_report(report, "amp");
    assert!(html.contains("<p>fish &amp; <strong>amp</strong> chips</p>"));
    assert!(!html.contains("&<strong>"));
}

#[test]
fn test_empty_search_has_no_entries() {
    let input = fields(&[("title", "anything"), ("body", "anything")]);
    assert!(extract_matches(&input, "").is_empty());
    assert!(replace_in_fields(&input, "", "x").is_empty());
}

#[test]
fn test_replace_round_trip() {
    let original = long_body("<p>the cat sat on the mat</p>");
    let there = replace(&original, "cat", "dog");
    assert_ne!(there, original);
    assert_eq!(replace(&there, "dog", "cat"), original);
}

#[test]
fn test_replace_in_fields_reports_counts() {
    let results = replace_in_fields(
        &fields(&[("title", "cat cat"), ("body", "<p>one cat</p>"), ("x", "dog")]),
        "cat",
        "dog",
    );
    assert_eq!(results.len(), 2);
    assert_eq!(results["title"].new_value, "dog dog");
    assert_eq!(results["title"].replacements, 2);
    assert_eq!(results["body"].new_value, "<p>one dog</p>");
}

#[test]
fn test_item_workflow() {
    let service = SearchReplace::new(&Config::default());
    let mut item = ContentItem::new("1", "article")
        .with_field(FieldDescriptor::new("title", "string"), "Acme news")
        .with_field(
            FieldDescriptor::new("body", "text_with_summary"),
            long_body(r#"<p>Acme <a href="https://acme.example">Acme site</a></p>"#),
        )
        .with_values(
            FieldDescriptor::new("field_aliases", "text").with_cardinality(CARDINALITY_UNLIMITED),
            ["Acme", "ACME"],
        );

    let matches = service.matched_fields(&item, "Acme").unwrap();
    assert_eq!(matches.reports.len(), 2);
    assert_eq!(
        matches.reports[1].snippets,
        vec![
            r#"<a href="https://acme.example">Acme site</a>"#,
            "<p>Acme </p>"
        ]
    );
    assert!(matches!(
        matches.errors[0].error,
        SarError::UnsupportedCardinality { .. }
    ));

    let html = service.render(&matches, "Acme");
    assert!(html.contains(r#"<a href="https://acme.example">Acme site</a>...<p><strong>Acme</strong> </p>"#));

    let context = ReplaceContext::new("Acme", "Globex").unwrap();
    let replacement = service.replace(&item, &context);
    item.apply(&replacement);
    assert_eq!(item.field("title").unwrap().value(), Some("Globex news"));
    assert!(service.matched_fields(&item, "Acme").unwrap().reports.is_empty());
}

#[test]
fn test_context_survives_serialization() {
    let context = ReplaceContext::new("old", "new").unwrap();
    let json = serde_json::to_string(&context).unwrap();
    let back: ReplaceContext = serde_json::from_str(&json).unwrap();
    assert_eq!(back, context);
}

#[test]
fn test_custom_config_changes_extraction() {
    let mut config = Config::default();
    config.extract.tags = vec!["h2".into()];
    config.render.separator = " / ".into();
    let service = SearchReplace::new(&config);

    let item = ContentItem::new("2", "page").with_field(
        FieldDescriptor::new("body", "text_long"),
        long_body("<h2>needle one</h2><p>needle two</p><h2>needle three</h2>"),
    );
    let matches = service.matched_fields(&item, "needle").unwrap();
    assert_eq!(matches.reports[0].summary, "3 matches.");
    assert_eq!(
        matches.reports[0].snippets,
        vec!["<h2>needle three</h2>", "<h2>needle one</h2>"]
    );
    assert!(service.render(&matches, "needle").contains("</h2> / <h2>"));
}
