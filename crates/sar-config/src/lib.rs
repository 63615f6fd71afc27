//! Configuration system for sar.
//!
//! sar uses TOML configuration files named `.sar.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.sar.toml` files found, then loading `~/.sar.toml` as the global config with lowest
//! precedence. Every setting has a default, so running without any file is normal.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawExtractSettings, RawFieldSettings, RawRenderSettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::config_template;

/// Tag names that may never be used as context elements: hyperlinks are reported
/// through their enclosing element.
const FORBIDDEN_TAGS: &[&str] = &["a"];

/// Top-level merged configuration for sar.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Match extraction settings.
    pub extract: ExtractSettings,
    /// Text field classification settings.
    pub fields: FieldSettings,
    /// Report rendering settings.
    pub render: RenderSettings,
    /// Directory containing the most specific config file, if any was found.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.sar.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Checks that the settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extract.short_field_limit == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "extract.short_field_limit",
                message: "must be greater than zero".into(),
            });
        }
        if self.extract.tags.is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: "extract.tags",
                message: "at least one tag is required".into(),
            });
        }
        for tag in &self.extract.tags {
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::InvalidSetting {
                    key: "extract.tags",
                    message: format!("'{tag}' is not a tag name"),
                });
            }
            if FORBIDDEN_TAGS.contains(&tag.as_str()) {
                return Err(ConfigError::InvalidSetting {
                    key: "extract.tags",
                    message: format!("'{tag}' cannot be a context element"),
                });
            }
        }
        Ok(())
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            extract: &self.extract,
            fields: &self.fields,
            render: &self.render,
        };
        // Plain strings, integers and string lists always serialize.
        toml::to_string_pretty(&serializable).unwrap_or_default()
    }
}

/// The item title, which is always reported verbatim.
const TITLE_FIELD: &str = "title";

/// Settings controlling how match context is extracted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Fields no longer than this many bytes are reported verbatim.
    pub short_field_limit: usize,
    /// Fields always reported verbatim regardless of length. `title` is verbatim
    /// whether or not it is listed.
    pub verbatim_fields: Vec<String>,
    /// Context element tags, in the order they are searched.
    pub tags: Vec<String>,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            short_field_limit: 255,
            verbatim_fields: vec!["title".into()],
            tags: ["li", "p", "h2", "h3"].map(String::from).to_vec(),
        }
    }
}

impl ExtractSettings {
    /// Returns true if `field` is always reported verbatim.
    pub fn is_verbatim(&self, field: &str) -> bool {
        field == TITLE_FIELD || self.verbatim_fields.iter().any(|name| name == field)
    }
}

/// Settings deciding which fields of an item are text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Field names always treated as text.
    pub core: Vec<String>,
    /// Name prefix of custom fields.
    pub custom_prefix: String,
    /// Type prefix that marks a custom field as text.
    pub text_type_prefix: String,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            core: vec!["title".into(), "body".into()],
            custom_prefix: "field_".into(),
            text_type_prefix: "text".into(),
        }
    }
}

impl FieldSettings {
    /// Returns true if a field with this name and storage type holds text.
    pub fn is_text_field(&self, name: &str, field_type: &str) -> bool {
        self.core.iter().any(|core| core == name)
            || (name.starts_with(&self.custom_prefix)
                && field_type.starts_with(&self.text_type_prefix))
    }
}

/// Settings for rendering match reports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Separator placed between snippets.
    pub separator: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            separator: "...".into(),
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Extraction settings.
    extract: &'a ExtractSettings,
    /// Field settings.
    fields: &'a FieldSettings,
    /// Render settings.
    render: &'a RenderSettings,
}
