//! Literal search-and-replace over field values.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::extract::count_occurrences;

/// Outcome of replacing within one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementResult {
    /// Field name.
    pub field: String,
    /// Field value after replacement.
    pub new_value: String,
    /// True if `new_value` differs from the input.
    pub changed: bool,
    /// Number of occurrences substituted.
    pub replacements: usize,
}

/// Replaces every literal, non-overlapping occurrence of `search` in `value`.
///
/// Matching is case-sensitive and scans left to right. An empty search string returns
/// the value unchanged.
pub fn replace(value: &str, search: &str, replacement: &str) -> String {
    if search.is_empty() {
        return value.to_string();
    }
    value.replace(search, replacement)
}

/// Replaces within one field and reports what happened.
pub fn replace_field(field: &str, value: &str, search: &str, replacement: &str) -> ReplacementResult {
    let replacements = count_occurrences(value, search);
    let new_value = if replacements == 0 {
        value.to_string()
    } else {
        replace(value, search, replacement)
    };
    ReplacementResult {
        field: field.to_string(),
        changed: new_value != value,
        new_value,
        replacements,
    }
}

/// Replaces within every field of a `name -> text` map.
///
/// Only fields containing the search string appear in the result. An empty search
/// string yields an empty map.
pub fn replace_in_fields(
    fields: &BTreeMap<String, String>,
    search: &str,
    replacement: &str,
) -> BTreeMap<String, ReplacementResult> {
    fields
        .iter()
        .map(|(name, value)| replace_field(name, value, search, replacement))
        .filter(|result| result.replacements > 0)
        .map(|result| (result.field.clone(), result))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_all_occurrences() {
        assert_eq!(replace("a cat and a cat", "cat", "dog"), "a dog and a dog");
    }

    #[test]
    fn case_sensitive() {
        assert_eq!(replace("Cat cat", "cat", "dog"), "Cat dog");
    }

    #[test]
    fn non_overlapping_left_to_right() {
        assert_eq!(replace("aaa", "aa", "b"), "ba");
    }

    #[test]
    fn empty_search_is_identity() {
        assert_eq!(replace("unchanged", "", "x"), "unchanged");
    }

    #[test]
    fn markup_is_preserved() {
        assert_eq!(
            replace(r#"<p class="old">old</p>"#, "old", "new"),
            r#"<p class="new">new</p>"#
        );
    }

    #[test]
    fn round_trip_restores_text() {
        let original = "the quick fox jumps over the lazy fox";
        let forward = replace(original, "fox", "cat");
        assert_eq!(replace(&forward, "cat", "fox"), original);
    }

    #[test]
    fn replace_field_counts() {
        let result = replace_field("body", "x y x", "x", "z");
        assert_eq!(result.new_value, "z y z");
        assert_eq!(result.replacements, 2);
        assert!(result.changed);
    }

    #[test]
    fn identical_replacement_is_unchanged() {
        let result = replace_field("body", "same", "same", "same");
        assert_eq!(result.replacements, 1);
        assert!(!result.changed);
    }

    #[test]
    fn replace_in_fields_skips_untouched() {
        let fields = BTreeMap::from([
            ("title".to_string(), "Old title".to_string()),
            ("body".to_string(), "nothing here".to_string()),
        ]);
        let results = replace_in_fields(&fields, "Old", "New");
        assert_eq!(results.len(), 1);
        assert_eq!(results["title"].new_value, "New title");
    }

    #[test]
    fn replace_in_fields_empty_search() {
        let fields = BTreeMap::from([("body".to_string(), "text".to_string())]);
        assert!(replace_in_fields(&fields, "", "x").is_empty());
    }
}
