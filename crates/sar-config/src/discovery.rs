//! Locating `.sar.toml` files.
//!
//! Every ancestor of the working directory may hold a `.sar.toml`; the closest one wins.
//! `~/.sar.toml` is consulted last unless some file on the way up is a root.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// Name of a sar config file.
pub const CONFIG_FILENAME: &str = ".sar.toml";

/// Returns the config files that apply in `cwd`, highest precedence first.
///
/// Stops at the first file with `root = true`; the global file is then skipped too.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let stop = is_root_config(&candidate);
        configs.push(candidate);
        if stop {
            return configs;
        }
    }

    if let Some(global) = global_config_path()
        && global.is_file()
        && !configs.contains(&global)
    {
        configs.push(global);
    }
    configs
}

/// Returns `~/.sar.toml`, or `None` without a home directory.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}
