//! Filter query parsing for sar.
//!
//! Turns a free-text filter value into word and phrase tokens, and turns those tokens
//! into an abstract predicate that a host query layer can translate:
//!
//! - **Words**: `rust` - matched as a substring
//! - **Phrases**: `"error handling"` - one token, quotes stripped
//! - **Negation**: `-deprecated` - token flagged as negated
//! - **Operators**: `contains`, `word`, `allwords`, `regex`
//!
//! # Example
//!
//! ```
//! use sar_query::{FilterOperator, build_predicate, tokenize};
//!
//! let tokens = tokenize("\"hello world\" -foo");
//! assert_eq!(tokens.len(), 2);
//!
//! let predicate = build_predicate(FilterOperator::AllWords, "node.body", "hello world");
//! assert!(predicate.is_some());
//! ```

#![warn(missing_docs)]

mod error;
mod lexer;
mod predicate;

pub use error::FilterError;
pub use lexer::{PUNCTUATION, Token, tokenize, trim_punctuation};
pub use predicate::{
    Clause, ClauseOp, Combinator, FilterOperator, Predicate, SearchQuery, build_predicate,
    escape_like,
};
