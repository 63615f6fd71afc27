//! Reading single `.sar.toml` files.
//!
//! Each file becomes a [`RawConfig`] in which every setting is optional, so a file only
//! overrides what it names. Merging over the defaults happens in `merge`.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// One config file's settings, before merging.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Ends discovery at this file; parent and global files are ignored.
    pub root: Option<bool>,
    /// Match extraction section.
    pub extract: Option<RawExtractSettings>,
    /// Text field classification section.
    pub fields: Option<RawFieldSettings>,
    /// Report rendering section.
    pub render: Option<RawRenderSettings>,
}

/// Raw match extraction settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExtractSettings {
    /// Byte length at or below which a field is reported verbatim.
    pub short_field_limit: Option<usize>,
    /// Fields always reported verbatim. Accepts a string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub verbatim_fields: Option<Vec<String>>,
    /// Context element tags, in search order. Accepts a string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub tags: Option<Vec<String>>,
}

/// Raw text field classification settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFieldSettings {
    /// Field names always treated as text. Accepts a string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub core: Option<Vec<String>>,
    /// Name prefix of custom fields.
    pub custom_prefix: Option<String>,
    /// Type prefix that marks a custom field as text.
    pub text_type_prefix: Option<String>,
}

/// Raw rendering settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRenderSettings {
    /// Separator placed between snippets.
    pub separator: Option<String>,
}

/// Reads and parses the config file at `path`.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|contents| parse_config_str(&contents, path))
}

/// Parses config text; `path` only labels errors.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses config text, returning the bare TOML error.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Returns true if the file at `path` sets `root = true`.
///
/// Unreadable or malformed files are not roots; loading reports their errors later.
pub fn is_root_config(path: &Path) -> bool {
    parse_config_file(path).is_ok_and(|config| config.root.unwrap_or(false))
}
