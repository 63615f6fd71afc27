//! Field descriptors and the per-bundle text field cache.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use sar_config::FieldSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cardinality of a field that holds any number of values.
pub const CARDINALITY_UNLIMITED: i32 = -1;

/// Describes one field of a content item, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Machine name of the field.
    pub name: String,
    /// Storage type, such as `text_long` or `string`.
    #[serde(rename = "type", default)]
    pub field_type: String,
    /// Maximum number of values; [`CARDINALITY_UNLIMITED`] for no limit.
    #[serde(default = "single_value")]
    pub cardinality: i32,
}

/// Default cardinality.
fn single_value() -> i32 {
    1
}

impl FieldDescriptor {
    /// Creates a single-value descriptor.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            cardinality: 1,
        }
    }

    /// Returns a copy with the given cardinality.
    #[must_use]
    pub fn with_cardinality(mut self, cardinality: i32) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Returns true if the field holds text that search-and-replace applies to.
    pub fn is_text_like(&self, settings: &FieldSettings) -> bool {
        settings.is_text_field(&self.name, &self.field_type)
    }

    /// Returns true if the field holds exactly one value.
    pub fn is_single_value(&self) -> bool {
        self.cardinality == 1
    }
}

/// Caches the text-like fields of each bundle.
///
/// A bundle's fields are computed on first use and shared afterwards. Two threads
/// missing at once both compute the list; the results are identical.
#[derive(Debug, Default)]
pub struct TextFieldCache {
    /// Bundle name to its text-like fields, in host order.
    entries: Mutex<HashMap<String, Arc<[FieldDescriptor]>>>,
}

impl TextFieldCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text-like fields of `bundle`, computing them from `fields` on a miss.
    pub fn text_fields<'a, I>(
        &self,
        bundle: &str,
        fields: I,
        settings: &FieldSettings,
    ) -> Arc<[FieldDescriptor]>
    where
        I: IntoIterator<Item = &'a FieldDescriptor>,
    {
        if let Some(cached) = self.lock().get(bundle) {
            return Arc::clone(cached);
        }

        let computed: Arc<[FieldDescriptor]> = fields
            .into_iter()
            .filter(|field| field.is_text_like(settings))
            .cloned()
            .collect();
        debug!(bundle, count = computed.len(), "cached text fields");

        Arc::clone(
            self.lock()
                .entry(bundle.to_string())
                .or_insert(computed),
        )
    }

    /// Returns the number of cached bundles.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no bundle is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every cached bundle.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Locks the map. A panic while holding the lock leaves it usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<[FieldDescriptor]>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    /// A bundle with no fields.
    const NONE: &[FieldDescriptor] = &[];

    fn article() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("title", "string"),
            FieldDescriptor::new("body", "text_with_summary"),
            FieldDescriptor::new("field_tags", "entity_reference")
                .with_cardinality(CARDINALITY_UNLIMITED),
            FieldDescriptor::new("field_note", "text_long"),
            FieldDescriptor::new("uid", "entity_reference"),
        ]
    }

    #[test]
    fn classifies_text_fields() {
        let settings = FieldSettings::default();
        let names: Vec<_> = article()
            .into_iter()
            .filter(|f| f.is_text_like(&settings))
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["title", "body", "field_note"]);
    }

    #[test]
    fn cache_fills_once_per_bundle() {
        let cache = TextFieldCache::new();
        let settings = FieldSettings::default();
        let fields = article();

        let first = cache.text_fields("article", &fields, &settings);
        assert_eq!(first.len(), 3);

        // A hit ignores the supplied fields.
        let second = cache.text_fields("article", NONE, &settings);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let page = cache.text_fields("page", NONE, &settings);
        assert!(page.is_empty());
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_lookups_share_one_entry() {
        let cache = TextFieldCache::new();
        let settings = FieldSettings::default();
        let fields = article();

        let results: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.text_fields("article", &fields, &settings)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        let stored = cache.text_fields("article", NONE, &settings);
        for result in &results {
            assert!(Arc::ptr_eq(result, &stored));
        }
        let names: Vec<_> = stored.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "body", "field_note"]);
    }

    #[test]
    fn descriptor_defaults_from_json() {
        let field: FieldDescriptor = serde_json::from_str(r#"{"name": "body"}"#).unwrap();
        assert_eq!(field.cardinality, 1);
        assert_eq!(field.field_type, "");
        assert!(field.is_single_value());

        let field: FieldDescriptor =
            serde_json::from_str(r#"{"name": "field_x", "type": "text", "cardinality": -1}"#)
                .unwrap();
        assert_eq!(field.cardinality, CARDINALITY_UNLIMITED);
        assert!(!field.is_single_value());
    }

    #[test]
    fn cache_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TextFieldCache>();
    }
}
