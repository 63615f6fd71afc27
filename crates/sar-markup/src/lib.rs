//! HTML fragment walking for sar.
//!
//! Field text is parsed with a tolerant HTML5 parser and copied into a small arena tree
//! that supports the two queries match extraction needs (elements by tag, hyperlinks
//! inside an element) plus in-place removal of nodes.
//!
//! Node ids are arena indices. Detaching a node unlinks it from its parent but never
//! moves or frees any slot, so ids collected before a removal stay valid after it.

#![warn(missing_docs)]

mod error;
mod parse;
mod tree;

pub use error::MarkupError;
pub use parse::parse;
pub use tree::{Descendants, MarkupTree, NodeId, StructuralElement};
