//! Filter predicate building.
//!
//! Translates a filter operator and raw value into an abstract predicate description.
//! Nothing here executes a query: the host storage layer maps each [`Clause`] onto its
//! own query language.

use std::{fmt, slice, str::FromStr};

use serde::Serialize;

use crate::{
    error::FilterError,
    lexer::{Token, tokenize},
};

/// How a filter value is matched against text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// The whole value must appear as a substring.
    Contains,
    /// Any one of the value's words or phrases must appear.
    Word,
    /// Every word and phrase of the value must appear.
    AllWords,
    /// The value is a raw regular expression.
    Regex,
}

impl FilterOperator {
    /// All operators, in the order they are offered to users.
    pub const ALL: [Self; 4] = [Self::Contains, Self::Word, Self::AllWords, Self::Regex];

    /// Returns the operator's identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Word => "word",
            Self::AllWords => "allwords",
            Self::Regex => "regex",
        }
    }

    /// Returns a human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Contains => "Contains",
            Self::Word => "Contains any word",
            Self::AllWords => "Contains all words",
            Self::Regex => "Regular expression",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "contains" => Ok(Self::Contains),
            "word" => Ok(Self::Word),
            "allwords" => Ok(Self::AllWords),
            "regex" | "regular_expression" => Ok(Self::Regex),
            _ => Err(FilterError::UnknownOperator { name: s.to_string() }),
        }
    }
}

/// How the clauses of a group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    /// Every clause must hold.
    And,
    /// At least one clause must hold.
    Or,
}

impl Combinator {
    /// Returns the SQL-style keyword.
    fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Comparison performed by a single clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseOp {
    /// Pattern match with `%` wildcards.
    Like,
    /// Negated pattern match.
    NotLike,
    /// Regular expression match.
    Regexp,
}

impl ClauseOp {
    /// Returns the SQL-style keyword.
    fn keyword(self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Regexp => "REGEXP",
        }
    }
}

/// A single comparison between a field expression and a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    /// The field expression the host compares against.
    pub expression: String,
    /// The comparison.
    pub op: ClauseOp,
    /// The literal, already wrapped in `%` wildcards for LIKE comparisons.
    pub literal: String,
}

impl Clause {
    /// Creates a substring clause for `text`, escaping LIKE metacharacters.
    fn substring(expression: &str, text: &str, negated: bool) -> Self {
        Self {
            expression: expression.to_string(),
            op: if negated {
                ClauseOp::NotLike
            } else {
                ClauseOp::Like
            },
            literal: format!("%{}%", escape_like(text)),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} '{}'",
            self.expression,
            self.op.keyword(),
            self.literal.replace('\'', "''")
        )
    }
}

/// An abstract filter predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// A lone clause.
    Clause(Clause),
    /// Clauses joined by a combinator.
    Group {
        /// How the clauses combine.
        combinator: Combinator,
        /// The clauses, in token order.
        clauses: Vec<Clause>,
    },
}

impl Predicate {
    /// Builds a group with one substring clause per token.
    ///
    /// Returns `None` when there are no tokens.
    pub fn from_tokens(combinator: Combinator, expression: &str, tokens: &[Token]) -> Option<Self> {
        if tokens.is_empty() {
            return None;
        }
        let clauses = tokens
            .iter()
            .map(|token| Clause::substring(expression, &token.text, token.negated))
            .collect();
        Some(Self::Group {
            combinator,
            clauses,
        })
    }

    /// Returns every clause of the predicate.
    pub fn clauses(&self) -> &[Clause] {
        match self {
            Self::Clause(clause) => slice::from_ref(clause),
            Self::Group { clauses, .. } => clauses,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clause(clause) => write!(f, "{clause}"),
            Self::Group {
                combinator,
                clauses,
            } => {
                let parts: Vec<String> = clauses.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "({})",
                    parts.join(&format!(" {} ", combinator.keyword()))
                )
            }
        }
    }
}

/// A filter value paired with the operator used to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    /// The raw filter value as typed.
    pub raw: String,
    /// How the value is interpreted.
    pub operator: FilterOperator,
}

impl SearchQuery {
    /// Creates a new search query.
    pub fn new(raw: impl Into<String>, operator: FilterOperator) -> Self {
        Self {
            raw: raw.into(),
            operator,
        }
    }

    /// Returns the value's word and phrase tokens.
    pub fn tokens(&self) -> Vec<Token> {
        tokenize(&self.raw)
    }

    /// Builds the predicate for `expression`.
    pub fn predicate(&self, expression: &str) -> Option<Predicate> {
        build_predicate(self.operator, expression, &self.raw)
    }
}

/// Builds the predicate describing `operator` applied to `raw` on `expression`.
///
/// Returns `None` for a blank value, which means "no filter".
pub fn build_predicate(operator: FilterOperator, expression: &str, raw: &str) -> Option<Predicate> {
    if raw.trim().is_empty() {
        return None;
    }

    match operator {
        FilterOperator::Contains => Some(Predicate::Clause(Clause::substring(
            expression, raw, false,
        ))),
        FilterOperator::Word => Predicate::from_tokens(Combinator::Or, expression, &tokenize(raw)),
        FilterOperator::AllWords => {
            Predicate::from_tokens(Combinator::And, expression, &tokenize(raw))
        }
        FilterOperator::Regex => Some(Predicate::Clause(Clause {
            expression: expression.to_string(),
            op: ClauseOp::Regexp,
            literal: raw.to_string(),
        })),
    }
}

/// Escapes the LIKE metacharacters `\`, `%` and `_` with a backslash.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
