//! Implementation of `sar filter`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use sar_query::{FilterOperator, Predicate, SearchQuery, Token};
use serde::Serialize;

use crate::cli::{
    args::FilterCommand,
    output::{dim, print_json, subheader},
};

/// JSON output for `sar filter`.
#[derive(Serialize)]
struct JsonFilterOutput<'a> {
    /// Value and operator.
    query: &'a SearchQuery,
    /// Tokens of the value.
    tokens: &'a [Token],
    /// Resulting predicate; absent for a blank value.
    predicate: Option<&'a Predicate>,
}

/// Shows how a filter value is tokenized and which predicate it produces.
pub fn run(cmd: &FilterCommand) -> ExitCode {
    let query = SearchQuery::new(cmd.value.as_str(), cmd.operator);
    let tokens = query.tokens();
    let predicate = query.predicate(&cmd.expression);

    if cmd.json {
        return print_json(&JsonFilterOutput {
            query: &query,
            tokens: &tokens,
            predicate: predicate.as_ref(),
        });
    }

    println!("{} {}", subheader("Operator:"), query.operator.title());

    if matches!(query.operator, FilterOperator::Word | FilterOperator::AllWords) {
        println!("{}", subheader("Tokens:"));
        if tokens.is_empty() {
            println!("  {}", dim("(none)"));
        } else {
            println!("{}", token_table(&tokens));
        }
    }

    println!("{}", subheader("Predicate:"));
    match predicate {
        Some(predicate) => println!("  {predicate}"),
        None => println!("  {}", dim("(no filter)")),
    }

    ExitCode::SUCCESS
}

/// Builds a table describing each token.
fn token_table(tokens: &[Token]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Token", "Kind", "Negated"]);
    for token in tokens {
        table.add_row(vec![
            Cell::new(&token.text),
            Cell::new(if token.is_phrase { "phrase" } else { "word" }),
            Cell::new(if token.negated { "yes" } else { "no" }),
        ]);
    }
    table
}
