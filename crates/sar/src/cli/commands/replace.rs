//! Implementation of `sar replace`.

use std::{fs, process::ExitCode};

use sar_core::{FieldFailure, ReplaceContext, ReplacementResult, SearchReplace, replace_in_fields};
use tracing::debug;

use crate::cli::{
    args::ReplaceCommand,
    context::CommandContext,
    input::{ItemInput, read_input},
    output::{dim, plural, replacement_table, report_failures, success},
};

/// Replaces the search string in every field and prints or writes the result.
pub fn run(ctx: &CommandContext, cmd: &ReplaceCommand) -> ExitCode {
    let context = match ReplaceContext::new(cmd.search.as_str(), cmd.replacement.as_str()) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut input = match read_input(&cmd.input) {
        Ok(input) => input,
        Err(code) => return code,
    };

    let service = SearchReplace::new(&ctx.config);
    let (results, failures) = apply_replacement(&service, &mut input, &context);

    if cmd.in_place
        && let Some(path) = &cmd.input.path
    {
        let written = input
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(path, json + "\n").map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("error: failed to write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        debug!(path = %path.display(), "wrote updated item");
    }

    if cmd.json {
        match input.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else if results.is_empty() {
        println!("{}", dim("No occurrences found."));
    } else {
        let total: usize = results.iter().map(|result| result.replacements).sum();
        println!("{}", replacement_table(&results));
        println!(
            "{}",
            success(&format!(
                "Replaced {} in {}",
                plural(total, "occurrence"),
                plural(results.len(), "field")
            ))
        );
    }

    report_failures(&failures)
}

/// Replaces within the input and writes the new values back into it.
fn apply_replacement(
    service: &SearchReplace,
    input: &mut ItemInput,
    context: &ReplaceContext,
) -> (Vec<ReplacementResult>, Vec<FieldFailure>) {
    match input {
        ItemInput::Values(values) => {
            let results = replace_in_fields(values, context.search(), context.replacement());
            for (field, result) in &results {
                debug!(field = %field, count = result.replacements, "replaced text");
                values.insert(field.clone(), result.new_value.clone());
            }
            (results.into_values().collect(), Vec::new())
        }
        ItemInput::Item(item) => {
            let replacement = service.replace(item, context);
            item.apply(&replacement);
            (replacement.results, replacement.errors)
        }
    }
}
