//! Error types for filter queries.

use thiserror::Error;

/// Errors that can occur when interpreting a filter query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The operator name is not one of `contains`, `word`, `allwords`, `regex`.
    #[error("unknown filter operator '{name}' (expected contains, word, allwords or regex)")]
    UnknownOperator {
        /// The operator name as given.
        name: String,
    },
}
