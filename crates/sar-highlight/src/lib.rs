//! Terminal styling for sar output.
//!
//! Snippets are HTML and settings are TOML. Both pass through syntect with the Dracula
//! theme on their way to a terminal; headings and notes use plain ANSI codes.

#![warn(missing_docs)]

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax,
    theme::{self, EmbeddedLazyThemeSet, EmbeddedThemeName},
};

/// ANSI reset, appended after every styled span.
const RESET: &str = "\x1b[0m";

/// Languages sar prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// Match snippets and rendered reports.
    Html,
    /// Configuration.
    Toml,
}

impl Syntax {
    /// Extension syntect knows the grammar by.
    fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Toml => "toml",
        }
    }
}

/// Syntax highlighter for snippets and settings.
pub struct Highlighter {
    /// Grammars bundled with two-face.
    syntaxes: SyntaxSet,
    /// Themes bundled with two-face, decoded on first use.
    themes: EmbeddedLazyThemeSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Loads the bundled grammars and themes.
    pub fn new() -> Self {
        Self {
            syntaxes: syntax::extra_newlines(),
            themes: theme::extra(),
        }
    }

    /// Highlights a snippet or rendered report.
    pub fn highlight_html(&self, content: &str) -> String {
        self.highlight(content, Syntax::Html)
    }

    /// Highlights TOML settings.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, Syntax::Toml)
    }

    /// Highlights `content` line by line. Lines the grammar rejects are left unstyled.
    pub fn highlight(&self, content: &str, syntax: Syntax) -> String {
        let grammar = self
            .syntaxes
            .find_syntax_by_extension(syntax.extension())
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        let mut lines = HighlightLines::new(grammar, self.themes.get(EmbeddedThemeName::Dracula));

        let mut output: String = LinesWithEndings::from(content)
            .map(|line| {
                let ranges = lines
                    .highlight_line(line, &self.syntaxes)
                    .unwrap_or_else(|_| vec![(Style::default(), line)]);
                as_24_bit_terminal_escaped(&ranges, false)
            })
            .collect();
        output.push_str(RESET);
        output
    }
}

/// Wraps `text` in an ANSI style.
fn paint(style: &str, text: &str) -> String {
    format!("{style}{text}{RESET}")
}

/// Field names: bold cyan.
pub fn header(text: &str) -> String {
    paint("\x1b[1;36m", text)
}

/// Section titles: bold.
pub fn subheader(text: &str) -> String {
    paint("\x1b[1m", text)
}

/// Summaries and notes.
pub fn dim(text: &str) -> String {
    paint("\x1b[2m", text)
}

/// Completion messages: green.
pub fn success(text: &str) -> String {
    paint("\x1b[32m", text)
}

/// A dimmed horizontal line `width` cells wide.
pub fn rule(width: usize) -> String {
    dim(&"─".repeat(width))
}
