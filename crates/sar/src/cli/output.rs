//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use sar_core::{FieldFailure, ReplacementResult};
pub use sar_highlight::{dim, header, subheader, success};
use serde::Serialize;

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Reports per-field failures on stderr.
///
/// Returns failure if there were any, so callers can finish their output first.
pub fn report_failures(failures: &[FieldFailure]) -> ExitCode {
    for failure in failures {
        eprintln!("error: field {}: {}", failure.field, failure.error);
    }
    if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Builds a table of per-field replacement counts.
pub fn replacement_table(results: &[ReplacementResult]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Field", "Replacements", "Changed"]);
    for result in results {
        table.add_row(vec![
            Cell::new(&result.field),
            Cell::new(result.replacements.to_string()),
            Cell::new(if result.changed { "yes" } else { "no" }),
        ]);
    }
    table
}

/// Pluralizes `noun` for `count`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use sar_core::SarError;

    use super::*;

    #[test]
    fn table_lists_fields() {
        let results = vec![ReplacementResult {
            field: "body".into(),
            new_value: "x".into(),
            changed: true,
            replacements: 3,
        }];
        let rendered = replacement_table(&results).to_string();
        assert!(rendered.contains("body"));
        assert!(rendered.contains('3'));
        assert!(rendered.contains("yes"));
    }

    #[test]
    fn failures_set_exit_code() {
        assert_eq!(report_failures(&[]), ExitCode::SUCCESS);
        let failure = FieldFailure {
            field: "body".into(),
            error: SarError::EmptySearchString,
        };
        assert_eq!(report_failures(&[failure]), ExitCode::FAILURE);
    }

    #[test]
    fn pluralizes() {
        assert_eq!(plural(1, "field"), "1 field");
        assert_eq!(plural(2, "field"), "2 fields");
    }
}
