//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single `Config`, applying precedence rules,
//! then validates the result.

use std::path::PathBuf;

use crate::{
    Config, ConfigError, ExtractSettings, FieldSettings, RenderSettings,
    parse::{RawConfig, RawExtractSettings, RawFieldSettings, RawRenderSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single validated `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to
/// the working directory), lowest precedence last (global config). Every setting takes
/// its first defined value; lists are replaced, not concatenated.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    // Lowest precedence first so higher precedence overwrites.
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.extract {
            apply_raw_extract(&mut config.extract, raw);
        }
        if let Some(ref raw) = parsed.config.fields {
            apply_raw_fields(&mut config.fields, raw);
        }
        if let Some(ref raw) = parsed.config.render {
            apply_raw_render(&mut config.render, raw);
        }
    }

    config.config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(|p| p.to_path_buf());

    config.validate()?;
    Ok(config)
}

/// Applies raw extraction settings, overwriting any present values.
fn apply_raw_extract(result: &mut ExtractSettings, raw: &RawExtractSettings) {
    if let Some(v) = raw.short_field_limit {
        result.short_field_limit = v;
    }
    if let Some(ref v) = raw.verbatim_fields {
        result.verbatim_fields = v.clone();
    }
    if let Some(ref v) = raw.tags {
        result.tags = v.iter().map(|tag| tag.to_ascii_lowercase()).collect();
    }
}

/// Applies raw field classification settings.
fn apply_raw_fields(result: &mut FieldSettings, raw: &RawFieldSettings) {
    if let Some(ref v) = raw.core {
        result.core = v.clone();
    }
    if let Some(ref v) = raw.custom_prefix {
        result.custom_prefix = v.clone();
    }
    if let Some(ref v) = raw.text_type_prefix {
        result.text_type_prefix = v.clone();
    }
}

/// Applies raw rendering settings.
fn apply_raw_render(result: &mut RenderSettings, raw: &RawRenderSettings) {
    if let Some(ref v) = raw.separator {
        result.separator = v.clone();
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::parse::parse_config_str;

    /// Parses `content` as if it were read from `path`.
    fn parsed(path: &str, content: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config_str(content, Path::new(path)).unwrap(),
        }
    }

    #[test]
    fn test_empty_list_gives_defaults() {
        let config = merge_configs(&[]).unwrap();
        assert_eq!(config.extract.short_field_limit, 255);
        assert!(config.config_root.is_none());
    }

    #[test]
    fn test_closest_wins() {
        let configs = [
            parsed("/proj/.sar.toml", "[extract]\nshort_field_limit = 100\n"),
            parsed(
                "/home/.sar.toml",
                "[extract]\nshort_field_limit = 500\ntags = [\"p\"]\n",
            ),
        ];
        let config = merge_configs(&configs).unwrap();
        assert_eq!(config.extract.short_field_limit, 100);
        assert_eq!(config.extract.tags, vec!["p"]);
        assert_eq!(config.config_root, Some(PathBuf::from("/proj")));
    }

    #[test]
    fn test_tags_lowercased() {
        let configs = [parsed("/p/.sar.toml", "[extract]\ntags = [\"LI\", \"H2\"]\n")];
        let config = merge_configs(&configs).unwrap();
        assert_eq!(config.extract.tags, vec!["li", "h2"]);
    }

    #[test]
    fn test_fields_and_render() {
        let configs = [parsed(
            "/p/.sar.toml",
            "[fields]\ncore = [\"title\"]\ntext_type_prefix = \"string\"\n\n[render]\nseparator = \" / \"\n",
        )];
        let config = merge_configs(&configs).unwrap();
        assert_eq!(config.fields.core, vec!["title"]);
        assert_eq!(config.fields.custom_prefix, "field_");
        assert_eq!(config.fields.text_type_prefix, "string");
        assert_eq!(config.render.separator, " / ");
    }

    #[test]
    fn test_invalid_merge_is_rejected() {
        let configs = [parsed("/p/.sar.toml", "[extract]\ntags = []\n")];
        let err = merge_configs(&configs).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                key: "extract.tags",
                ..
            }
        ));
    }
}
