//! Implementation of `sar config`.

use std::process::ExitCode;

use sar_config::discover_config_files;
use sar_highlight::{Highlighter, rule};

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader},
};

/// Shows the config files in effect and the merged settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let files = discover_config_files(&ctx.cwd);

    println!("{}", subheader("Config files (highest precedence first):"));
    if files.is_empty() {
        println!("  {}", dim("(none, using defaults)"));
    }
    for path in &files {
        println!("  {}", path.display());
    }
    println!();

    println!("{}", subheader("Effective settings:"));
    println!("{}", rule(40));
    print!(
        "{}",
        Highlighter::new().highlight_toml(&ctx.config.settings_to_toml())
    );
    println!("{}", rule(40));

    ExitCode::SUCCESS
}
