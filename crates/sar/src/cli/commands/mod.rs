//! Command implementations and dispatch.

pub mod config;
pub mod extract;
pub mod filter;
pub mod init;
pub mod replace;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Extract(cmd) => extract::run(ctx, &cmd),
        Commands::Replace(cmd) => replace::run(ctx, &cmd),
        Commands::Filter(cmd) => filter::run(&cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
