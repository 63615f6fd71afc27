//! HTML escaping for snippet text.

/// Entities produced by [`attribute`], with the character each stands for.
const ENTITIES: [(&str, char); 4] = [("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>'), ("&quot;", '"')];

/// Escapes text for use inside an element.
pub fn text(input: &str) -> String {
    attribute(input)
}

/// Escapes text for use inside a double-quoted attribute value.
pub fn attribute(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Splits escaped text into characters, each paired with its byte offset in `input`.
///
/// An entity counts as the single character it stands for.
pub fn decode_offsets(input: &str) -> Vec<(usize, char)> {
    let mut units = Vec::with_capacity(input.len());
    let mut at = 0;
    while let Some(c) = input[at..].chars().next() {
        let rest = &input[at..];
        let (ch, len) = ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
            .map_or((c, c.len_utf8()), |&(entity, ch)| (ch, entity.len()));
        units.push((at, ch));
        at += len;
    }
    units
}
