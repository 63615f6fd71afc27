//! Error types for match extraction and replacement.

use sar_markup::MarkupError;
use thiserror::Error;

/// Errors reported for a single field or request.
///
/// Field-level errors are collected next to the successful results of sibling fields;
/// they never abort processing of the rest of an item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SarError {
    /// The field text could not be parsed as markup.
    #[error("failed to parse field markup: {0}")]
    Markup(#[from] MarkupError),

    /// The field can hold more than one value, which is not supported.
    #[error("field {field} has cardinality {cardinality}; only single-value fields are supported")]
    UnsupportedCardinality {
        /// Field name.
        field: String,
        /// The field's cardinality (`-1` means unlimited).
        cardinality: i32,
    },

    /// A replacement was requested with an empty search string.
    ///
    /// Extraction and replacement treat an empty search string as a no-op; this error
    /// only surfaces when building a [`ReplaceContext`](crate::ReplaceContext).
    #[error("search string is empty")]
    EmptySearchString,
}
