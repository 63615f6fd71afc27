//! CLI support for the `sar` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod input;
pub mod output;
