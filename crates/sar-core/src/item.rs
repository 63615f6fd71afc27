//! Item-level search and replace.
//!
//! [`SearchReplace`] works on a host's view of one content item: the item's fields with
//! their descriptors and values. Only text-like fields are considered, and only
//! single-value fields can be searched or rewritten. A multi-value field that contains
//! the search string is reported as an error for that field alone.

use std::{collections::BTreeMap, sync::Arc};

use sar_config::{Config, FieldSettings};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use crate::{
    Extractor, FieldDescriptor, MatchReport, Renderer, ReplacementResult, SarError,
    TextFieldCache, replace::replace_field,
};

/// One field of a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemField {
    /// What the field is.
    #[serde(flatten)]
    pub descriptor: FieldDescriptor,
    /// Stored values, in delta order.
    #[serde(default)]
    pub values: Vec<String>,
}

impl ItemField {
    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Returns the first value, if any.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// A host's view of one content item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Item identifier.
    #[serde(default)]
    pub id: String,
    /// Bundle (content type) name. Text fields are cached per bundle.
    #[serde(default)]
    pub bundle: String,
    /// Fields in host order.
    #[serde(default)]
    pub fields: Vec<ItemField>,
}

impl ContentItem {
    /// Creates an item with no fields.
    pub fn new(id: impl Into<String>, bundle: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bundle: bundle.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a single-value field.
    #[must_use]
    pub fn with_field(mut self, descriptor: FieldDescriptor, value: impl Into<String>) -> Self {
        self.fields.push(ItemField {
            descriptor,
            values: vec![value.into()],
        });
        self
    }

    /// Adds a field holding several values.
    #[must_use]
    pub fn with_values<I, S>(mut self, descriptor: FieldDescriptor, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.push(ItemField {
            descriptor,
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Returns the field called `name`.
    pub fn field(&self, name: &str) -> Option<&ItemField> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns the first value of every field that has one.
    pub fn value_map(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|field| Some((field.name().to_string(), field.value()?.to_string())))
            .collect()
    }

    /// Writes replaced values back into the item.
    ///
    /// Returns the number of fields updated.
    pub fn apply(&mut self, replacement: &ItemReplacement) -> usize {
        let mut updated = 0;
        for result in replacement.results.iter().filter(|result| result.changed) {
            let Some(field) = self.fields.iter_mut().find(|f| f.descriptor.name == result.field)
            else {
                continue;
            };
            match field.values.first_mut() {
                Some(value) => *value = result.new_value.clone(),
                None => field.values.push(result.new_value.clone()),
            }
            updated += 1;
        }
        updated
    }
}

/// Search and replacement strings carried from the search step to the replace step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceContext {
    /// Literal text to find.
    search: String,
    /// Literal text to substitute.
    replacement: String,
}

impl ReplaceContext {
    /// Creates a context. The search string must not be empty.
    pub fn new(
        search: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self, SarError> {
        let search = search.into();
        if search.is_empty() {
            return Err(SarError::EmptySearchString);
        }
        Ok(Self {
            search,
            replacement: replacement.into(),
        })
    }

    /// Returns the search string.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns the replacement string.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// A per-field error, reported next to the results of the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    /// Field name.
    pub field: String,
    /// What went wrong.
    #[serde(serialize_with = "serialize_display")]
    pub error: SarError,
}

/// Serializes an error as its message.
fn serialize_display<S: Serializer>(error: &SarError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Matches found in one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMatches {
    /// Item identifier.
    pub item_id: String,
    /// Item bundle.
    pub bundle: String,
    /// One report per matching field, in field order.
    pub reports: Vec<MatchReport>,
    /// Fields that could not be searched.
    pub errors: Vec<FieldFailure>,
}

/// Replacements made in one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReplacement {
    /// Item identifier.
    pub item_id: String,
    /// Item bundle.
    pub bundle: String,
    /// One result per field containing the search string, in field order.
    pub results: Vec<ReplacementResult>,
    /// Fields that could not be rewritten.
    pub errors: Vec<FieldFailure>,
}

impl ItemReplacement {
    /// Returns true if any field value changed.
    pub fn changed(&self) -> bool {
        self.results.iter().any(|result| result.changed)
    }

    /// Returns the total number of occurrences replaced.
    pub fn replacements(&self) -> usize {
        self.results.iter().map(|result| result.replacements).sum()
    }
}

/// Searches and rewrites the text fields of content items.
///
/// Holds the settings and the per-bundle text field cache. Shareable across threads.
#[derive(Debug, Default)]
pub struct SearchReplace {
    /// Builds match reports.
    extractor: Extractor,
    /// Renders match reports.
    renderer: Renderer,
    /// Decides which fields are text.
    fields: FieldSettings,
    /// Text fields per bundle.
    cache: Arc<TextFieldCache>,
}

impl SearchReplace {
    /// Creates a service with its own cache.
    pub fn new(config: &Config) -> Self {
        Self::with_cache(config, Arc::default())
    }

    /// Creates a service sharing an existing cache.
    pub fn with_cache(config: &Config, cache: Arc<TextFieldCache>) -> Self {
        Self {
            extractor: Extractor::new(config.extract.clone()),
            renderer: Renderer::new(config.render.clone()),
            fields: config.fields.clone(),
            cache,
        }
    }

    /// Returns the extractor.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Returns the renderer.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Returns the text field cache.
    pub fn cache(&self) -> &Arc<TextFieldCache> {
        &self.cache
    }

    /// Collects the match reports for every text field of `item`.
    ///
    /// Returns `None` when the search string is empty. An item without matches yields
    /// `Some` with no reports, so the two cases stay distinct.
    pub fn matched_fields(&self, item: &ContentItem, search: &str) -> Option<ItemMatches> {
        if search.is_empty() {
            return None;
        }

        let mut reports = Vec::new();
        let mut errors = Vec::new();
        for field in self.text_fields(item) {
            let Some(value) = supported_value(field, search, &mut errors) else {
                continue;
            };
            match self.extractor.find_matches(field.name(), value, search) {
                Ok(Some(report)) => reports.push(report),
                Ok(None) => {}
                Err(e) => {
                    warn!(item = %item.id, field = field.name(), error = %e, "cannot search field");
                    errors.push(FieldFailure {
                        field: field.name().to_string(),
                        error: e.into(),
                    });
                }
            }
        }

        Some(ItemMatches {
            item_id: item.id.clone(),
            bundle: item.bundle.clone(),
            reports,
            errors,
        })
    }

    /// Replaces the search string in every text field of `item`.
    ///
    /// The item is not modified; pass the result to [`ContentItem::apply`] or persist
    /// the new values directly.
    pub fn replace(&self, item: &ContentItem, context: &ReplaceContext) -> ItemReplacement {
        let search = context.search();
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for field in self.text_fields(item) {
            let Some(value) = supported_value(field, search, &mut errors) else {
                continue;
            };
            if !value.contains(search) {
                continue;
            }
            let result = replace_field(field.name(), value, search, context.replacement());
            debug!(
                search,
                replacement = context.replacement(),
                bundle = %item.bundle,
                item = %item.id,
                field = field.name(),
                count = result.replacements,
                "replaced text"
            );
            results.push(result);
        }

        ItemReplacement {
            item_id: item.id.clone(),
            bundle: item.bundle.clone(),
            results,
            errors,
        }
    }

    /// Renders the matches of one item as HTML.
    pub fn render(&self, matches: &ItemMatches, search: &str) -> String {
        self.renderer.render_all(&matches.reports, search)
    }

    /// Returns the item's text fields, in item order.
    fn text_fields<'a>(&self, item: &'a ContentItem) -> Vec<&'a ItemField> {
        let text = self.cache.text_fields(
            &item.bundle,
            item.fields.iter().map(|field| &field.descriptor),
            &self.fields,
        );
        item.fields
            .iter()
            .filter(|field| text.iter().any(|d| d.name == field.descriptor.name))
            .collect()
    }
}

/// Returns the value to work on, or records an error for a multi-value field that
/// contains the search string.
fn supported_value<'a>(
    field: &'a ItemField,
    search: &str,
    errors: &mut Vec<FieldFailure>,
) -> Option<&'a str> {
    if field.descriptor.is_single_value() {
        return field.value();
    }
    if field.values.iter().any(|value| value.contains(search)) {
        errors.push(FieldFailure {
            field: field.name().to_string(),
            error: SarError::UnsupportedCardinality {
                field: field.name().to_string(),
                cardinality: field.descriptor.cardinality,
            },
        });
    }
    None
}
