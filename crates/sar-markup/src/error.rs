//! Error types for markup parsing.

use thiserror::Error;

/// Errors that can occur when parsing field markup.
///
/// Ordinary malformed HTML (unclosed tags, stray text) is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// The input contains a NUL byte and is treated as binary, not text.
    #[error("markup contains binary content (NUL byte at offset {offset})")]
    BinaryContent {
        /// Byte offset of the first NUL byte.
        offset: usize,
    },
}
