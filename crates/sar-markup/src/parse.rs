//! Fragment parsing.
//!
//! Runs the HTML5 fragment parser from `scraper` and copies the element and text nodes
//! into a [`MarkupTree`]. Comments, doctypes and processing instructions are dropped.

use scraper::{Html, Node};

use crate::{MarkupError, MarkupTree};

/// Parses an HTML fragment into a [`MarkupTree`].
///
/// Parsing is tolerant: unclosed tags, stray end tags and bare text are repaired the way
/// browsers do. Only input that is not text at all (contains a NUL byte) is rejected.
pub fn parse(input: &str) -> Result<MarkupTree, MarkupError> {
    if let Some(offset) = input.find('\0') {
        return Err(MarkupError::BinaryContent { offset });
    }

    let html = Html::parse_fragment(input);
    let mut tree = MarkupTree::new();
    let root = tree.root();

    // Iterative walk; deeply nested input must not exhaust the stack.
    let mut stack = vec![(html.tree.root(), root)];
    while let Some((node, parent)) = stack.pop() {
        let target = match node.value() {
            // The fragment parser wraps content in a synthetic <html> element.
            Node::Element(element) if !(parent == root && element.name() == "html") => {
                tree.append_element(parent, element.name(), element.attrs())
            }
            Node::Element(_) | Node::Document | Node::Fragment => parent,
            Node::Text(text) => {
                tree.append_text(parent, text);
                continue;
            }
            _ => continue,
        };

        for child in node.children().rev() {
            stack.push((child, target));
        }
    }

    Ok(tree)
}
