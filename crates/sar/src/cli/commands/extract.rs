//! Implementation of `sar extract`.

use std::process::ExitCode;

use sar_core::{FieldFailure, MatchReport, SearchReplace};
use sar_highlight::Highlighter;
use serde::Serialize;

use crate::cli::{
    args::ExtractCommand,
    context::CommandContext,
    input::{ItemInput, read_input},
    output::{dim, header, print_json, report_failures},
};

/// JSON output for `sar extract`.
#[derive(Serialize)]
struct JsonExtractOutput<'a> {
    /// The search string.
    search: &'a str,
    /// One report per matching field.
    reports: &'a [MatchReport],
    /// Fields that could not be searched.
    errors: &'a [FieldFailure],
}

/// Shows the matches of the search string in each field.
pub fn run(ctx: &CommandContext, cmd: &ExtractCommand) -> ExitCode {
    let input = match read_input(&cmd.input) {
        Ok(input) => input,
        Err(code) => return code,
    };

    let service = SearchReplace::new(&ctx.config);
    let (reports, failures) = find_matches(&service, &input, &cmd.search);

    if cmd.json {
        let output = JsonExtractOutput {
            search: &cmd.search,
            reports: &reports,
            errors: &failures,
        };
        let code = print_json(&output);
        return if code == ExitCode::SUCCESS {
            report_failures(&failures)
        } else {
            code
        };
    }

    if cmd.html {
        print!("{}", service.renderer().render_all(&reports, &cmd.search));
        if !reports.is_empty() {
            println!();
        }
    } else if reports.is_empty() {
        if failures.is_empty() {
            println!("{}", dim("No matches."));
        }
    } else {
        print_reports(&service, &reports, &cmd.search);
    }

    report_failures(&failures)
}

/// Collects reports and per-field failures for either input shape.
fn find_matches(
    service: &SearchReplace,
    input: &ItemInput,
    search: &str,
) -> (Vec<MatchReport>, Vec<FieldFailure>) {
    match input {
        ItemInput::Values(values) => {
            let mut reports = Vec::new();
            let mut failures = Vec::new();
            for (field, result) in service.extractor().extract_matches(values, search) {
                match result {
                    Ok(report) => reports.push(report),
                    Err(error) => failures.push(FieldFailure { field, error }),
                }
            }
            (reports, failures)
        }
        ItemInput::Item(item) => service
            .matched_fields(item, search)
            .map(|matches| (matches.reports, matches.errors))
            .unwrap_or_default(),
    }
}

/// Prints each report with highlighted snippets.
fn print_reports(service: &SearchReplace, reports: &[MatchReport], search: &str) {
    let highlighter = Highlighter::new();
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} {}", header(&report.field), dim(&report.summary));
        for snippet in &report.snippets {
            let emphasized = service.renderer().emphasize(snippet, search);
            println!("  {}", highlighter.highlight_html(&emphasized));
        }
    }
}
