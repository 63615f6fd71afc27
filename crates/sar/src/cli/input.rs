//! Reading item JSON from a file or stdin.

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Read},
    path::Path,
    process::ExitCode,
};

use sar_core::ContentItem;
use serde_json::Value;

use crate::cli::args::InputArgs;

/// An item as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemInput {
    /// A flat `name -> text` object. Every field is searched.
    Values(BTreeMap<String, String>),
    /// A full item whose descriptors decide which fields are text.
    Item(ContentItem),
}

impl ItemInput {
    /// Parses item JSON.
    ///
    /// An object with a `fields` array is a full item; any other object must map field
    /// names to strings.
    pub fn parse(text: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(text).map_err(|e| format!("invalid JSON: {e}"))?;
        let is_item = value.get("fields").is_some_and(Value::is_array);
        if is_item {
            serde_json::from_value(value)
                .map(Self::Item)
                .map_err(|e| format!("invalid item: {e}"))
        } else {
            serde_json::from_value(value).map(Self::Values).map_err(|e| {
                format!("expected an object of field names to text, or an item with a fields array: {e}")
            })
        }
    }

    /// Serializes the item back to the shape it was read in.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Values(values) => serde_json::to_string_pretty(values),
            Self::Item(item) => serde_json::to_string_pretty(item),
        }
    }
}

/// Reads and parses the item named by `args`, reporting failures on stderr.
pub fn read_input(args: &InputArgs) -> Result<ItemInput, ExitCode> {
    let text = match args.path.as_deref() {
        Some(path) if path != Path::new("-") => fs::read_to_string(path).map_err(|e| {
            eprintln!("error: failed to read {}: {e}", path.display());
            ExitCode::FAILURE
        })?,
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(|e| {
                eprintln!("error: failed to read stdin: {e}");
                ExitCode::FAILURE
            })?;
            text
        }
    };

    ItemInput::parse(&text).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_object_is_values() {
        let input = ItemInput::parse(r#"{"title": "A", "body": "<p>B</p>"}"#).unwrap();
        let ItemInput::Values(values) = input else {
            panic!("expected values");
        };
        assert_eq!(values["body"], "<p>B</p>");
    }

    #[test]
    fn fields_array_is_item() {
        let input = ItemInput::parse(
            r#"{"id": "1", "bundle": "page", "fields": [{"name": "body", "type": "text_long", "values": ["x"]}]}"#,
        )
        .unwrap();
        let ItemInput::Item(item) = input else {
            panic!("expected item");
        };
        assert_eq!(item.bundle, "page");
        assert_eq!(item.field("body").unwrap().value(), Some("x"));
    }

    #[test]
    fn non_string_values_are_rejected() {
        let err = ItemInput::parse(r#"{"count": 3}"#).unwrap_err();
        assert!(err.starts_with("expected an object"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(ItemInput::parse("{").unwrap_err().starts_with("invalid JSON"));
    }

    #[test]
    fn round_trips_shape() {
        let input = ItemInput::parse(r#"{"body": "x"}"#).unwrap();
        let json = input.to_json().unwrap();
        assert_eq!(ItemInput::parse(&json).unwrap(), input);
    }
}
