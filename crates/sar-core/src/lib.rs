//! Literal search-and-replace over the text fields of content items.
//!
//! The read path counts occurrences of a search string in each field and extracts
//! HTML context around them ([`Extractor`]), which [`Renderer`] turns into a report.
//! The write path substitutes the string in every field ([`replace`]). Both work on
//! plain `name -> text` maps or, through [`SearchReplace`], on a [`ContentItem`] whose
//! field descriptors decide which fields are text.
//!
//! Nothing here touches storage. Callers load values, pass them in and persist what
//! comes back.

#![warn(missing_docs)]

mod error;
mod escape;
mod extract;
mod fields;
mod item;
mod render;
mod replace;

use std::collections::BTreeMap;

pub use error::SarError;
pub use extract::{Extractor, MatchReport, count_occurrences, summary_line};
pub use fields::{CARDINALITY_UNLIMITED, FieldDescriptor, TextFieldCache};
pub use item::{
    ContentItem, FieldFailure, ItemField, ItemMatches, ItemReplacement, ReplaceContext,
    SearchReplace,
};
pub use render::Renderer;
pub use replace::{ReplacementResult, replace, replace_field, replace_in_fields};

/// Extracts match reports for every field of a `name -> text` map with default settings.
///
/// Fields without a match are absent. An empty search string yields an empty map.
pub fn extract_matches(
    fields: &BTreeMap<String, String>,
    search: &str,
) -> BTreeMap<String, Result<MatchReport, SarError>> {
    Extractor::default().extract_matches(fields, search)
}
