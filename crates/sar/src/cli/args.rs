//! Clap argument definitions for the `sar` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use sar_query::FilterOperator;

/// Parses a filter operator name.
fn parse_operator(s: &str) -> Result<FilterOperator, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sar")]
#[command(about = "Search and replace text in content item fields")]
pub struct Cli {
    /// Verbosity (-v for debug logs, -vv for trace logs)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Where item JSON is read from.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Item JSON file: a flat {"field": "text"} object or a full item with
    /// descriptors. Reads stdin when omitted or "-".
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub path: Option<PathBuf>,
}

/// Arguments for `sar extract`.
#[derive(Args, Debug, Clone)]
pub struct ExtractCommand {
    /// Literal text to search for
    pub search: String,

    #[command(flatten)]
    /// Item source.
    pub input: InputArgs,

    /// Output match reports as JSON
    #[arg(long, conflicts_with = "html")]
    pub json: bool,

    /// Output the rendered HTML without terminal highlighting
    #[arg(long)]
    pub html: bool,
}

/// Arguments for `sar replace`.
#[derive(Args, Debug, Clone)]
pub struct ReplaceCommand {
    /// Literal text to search for
    pub search: String,

    /// Literal text to substitute
    pub replacement: String,

    #[command(flatten)]
    /// Item source.
    pub input: InputArgs,

    /// Print the updated item as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Write the updated item back to the input file
    #[arg(long, requires = "path")]
    pub in_place: bool,
}

/// Arguments for `sar filter`.
#[derive(Args, Debug, Clone)]
pub struct FilterCommand {
    /// Filter value, such as `"error handling" -deprecated`
    pub value: String,

    /// Operator: contains, word, allwords, regex
    #[arg(short = 'o', long, default_value = "contains", value_parser = parse_operator)]
    pub operator: FilterOperator,

    /// Field expression the predicate compares against
    #[arg(short = 'e', long, default_value = "body")]
    pub expression: String,

    /// Output tokens and predicate as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sar init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.sar.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `sar` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show where a string occurs in an item's fields
    #[command(after_help = "\
EXAMPLES:
  sar extract needle -i item.json
  echo '{\"body\": \"<p>a needle</p>\"}' | sar extract needle
  sar extract 'find me' -i item.json --json")]
    Extract(ExtractCommand),

    /// Replace a string in an item's fields
    Replace(ReplaceCommand),

    /// Show the tokens and predicate built from a filter value
    #[command(after_help = "\
FILTER SYNTAX:
  word              Word must appear
  \"phrase\"          Exact phrase, quotes stripped
  -word             Word must NOT appear

OPERATORS:
  contains          Whole value as one substring
  word              Any word or phrase
  allwords          Every word and phrase
  regex             Value is a regular expression")]
    Filter(FilterCommand),

    /// Initialize sar configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}

impl Commands {
    /// Returns false for commands that must work with a broken config file.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Self::Init(_) | Self::Filter(_))
    }
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_operator_alias() {
        let cli = Cli::try_parse_from(["sar", "filter", "x", "-o", "regular_expression"]).unwrap();
        let Commands::Filter(cmd) = cli.command else {
            panic!("expected filter");
        };
        assert_eq!(cmd.operator, FilterOperator::Regex);
    }

    #[test]
    fn unknown_operator_is_rejected() {
        assert!(Cli::try_parse_from(["sar", "filter", "x", "-o", "fuzzy"]).is_err());
    }

    #[test]
    fn in_place_requires_file() {
        assert!(Cli::try_parse_from(["sar", "replace", "a", "b", "--in-place"]).is_err());
        assert!(
            Cli::try_parse_from(["sar", "replace", "a", "b", "-i", "x.json", "--in-place"]).is_ok()
        );
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["sar", "config", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
