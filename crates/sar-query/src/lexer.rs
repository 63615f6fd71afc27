//! Filter value lexer (tokenizer).
//!
//! Splits a raw filter value into word and phrase tokens. The lexer never fails:
//! malformed input is read leniently, so an unterminated quote simply runs to the
//! end of the input.

use std::{iter::Peekable, str::Chars};

use serde::Serialize;

/// Characters trimmed from both ends of every token before it is used as a literal.
pub const PUNCTUATION: &[char] = &[',', '?', '!', '(', ')', ';', ':', '-', '"'];

/// A word or phrase extracted from a filter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The literal text, with quotes, negation prefix and surrounding punctuation removed.
    pub text: String,
    /// Whether the token was prefixed with `-`.
    pub negated: bool,
    /// Whether the token came from a double-quoted phrase.
    pub is_phrase: bool,
}

impl Token {
    /// Creates a plain word token.
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            negated: false,
            is_phrase: false,
        }
    }

    /// Creates a phrase token.
    pub fn phrase(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            negated: false,
            is_phrase: true,
        }
    }

    /// Returns this token marked as negated.
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }
}

/// Tokenizes a filter value.
struct Lexer<'a> {
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    /// Tokenizes the entire input, dropping tokens that trim down to nothing.
    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token() {
            if !token.text.is_empty() {
                tokens.push(token);
            }
        }

        tokens
    }

    /// Returns the next raw token, or None at end of input.
    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();

        let &first = self.chars.peek()?;
        let negated = first == '-';
        if negated {
            self.chars.next();
        }

        let mut token = match self.chars.peek() {
            Some('"') => self.read_phrase(),
            _ => self.read_word(),
        };
        token.negated = negated;
        token.text = trim_punctuation(&token.text).to_string();
        Some(token)
    }

    /// Reads a quoted phrase. A missing closing quote ends the phrase at end of input.
    fn read_phrase(&mut self) -> Token {
        self.chars.next(); // opening quote

        let mut content = String::new();
        for ch in self.chars.by_ref() {
            if ch == '"' {
                break;
            }
            content.push(ch);
        }

        Token::phrase(content)
    }

    /// Reads a bare word up to the next whitespace or quote.
    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || ch == '"' {
                break;
            }
            word.push(ch);
            self.chars.next();
        }

        Token::word(word)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|ch| ch.is_whitespace()).is_some() {}
    }
}

/// Trims the filter punctuation set from both ends of `text`.
pub fn trim_punctuation(text: &str) -> &str {
    text.trim_matches(PUNCTUATION)
}

/// Splits a raw filter value into word and phrase tokens.
///
/// Empty or blank input yields an empty vector.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}
