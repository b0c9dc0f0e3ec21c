use mdview_syntax::{BlockKind, Indents, ParseOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_WIDTH: usize = 80;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid width 0 in config file at {config_path}")]
    InvalidWidth { config_path: PathBuf },
}

/// Left indent per block kind, in columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndentConfig {
    pub paragraph: usize,
    pub heading: usize,
    pub ordered_list: usize,
    pub unordered_list: usize,
    pub list_item: usize,
    pub code: usize,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            paragraph: 0,
            heading: 0,
            ordered_list: 0,
            unordered_list: 0,
            list_item: 2,
            code: 2,
        }
    }
}

impl IndentConfig {
    pub fn to_indents(&self) -> Indents {
        Indents::default()
            .with(BlockKind::Paragraph, self.paragraph)
            .with(BlockKind::Heading, self.heading)
            .with(BlockKind::OrderedList, self.ordered_list)
            .with(BlockKind::UnorderedList, self.unordered_list)
            .with(BlockKind::ListItem, self.list_item)
            .with(BlockKind::Code, self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wrap width in columns.
    pub width: usize,
    /// Document opened when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<PathBuf>,
    pub indents: IndentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            document: None,
            indents: IndentConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        if config.width == 0 {
            return Err(ConfigError::InvalidWidth {
                config_path: config_path.to_path_buf(),
            });
        }

        // Expand shell variables and tilde in the document path
        config.document = config
            .document
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mdview");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Parser options for this config, with `width_override` (e.g. from the
    /// command line or the terminal size) taking precedence over `width`.
    pub fn parse_options(&self, width_override: Option<usize>) -> ParseOptions {
        ParseOptions {
            width: width_override.unwrap_or(self.width),
            indents: self.indents.to_indents(),
        }
    }

    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/mdview/config.toml"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.indents.list_item, 2);
        assert_eq!(config.indents.code, 2);
    }

    #[test]
    fn test_partial_indents_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
width = 60

[indents]
paragraph = 1
"#,
        )
        .unwrap();

        assert_eq!(config.width, 60);
        assert_eq!(config.indents.paragraph, 1);
        assert_eq!(config.indents.list_item, 2);
        assert_eq!(config.document, None);
    }

    #[test]
    fn test_parse_options_maps_every_block() {
        let config = Config {
            width: 70,
            document: None,
            indents: IndentConfig {
                paragraph: 1,
                heading: 2,
                ordered_list: 3,
                unordered_list: 4,
                list_item: 5,
                code: 6,
            },
        };

        let options = config.parse_options(None);
        assert_eq!(options.width, 70);
        assert_eq!(options.indents.get(BlockKind::Paragraph), 1);
        assert_eq!(options.indents.get(BlockKind::Heading), 2);
        assert_eq!(options.indents.get(BlockKind::OrderedList), 3);
        assert_eq!(options.indents.get(BlockKind::UnorderedList), 4);
        assert_eq!(options.indents.get(BlockKind::ListItem), 5);
        assert_eq!(options.indents.get(BlockKind::Code), 6);
    }

    #[test]
    fn test_width_override() {
        let options = Config::default().parse_options(Some(40));
        assert_eq!(options.width, 40);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = Config {
            width: 64,
            document: Some(PathBuf::from("/tmp/readme.md")),
            indents: IndentConfig {
                code: 4,
                ..IndentConfig::default()
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_document_env_var_is_expanded_on_load() {
        unsafe {
            env::set_var("MDVIEW_TEST_DOCS", "/custom/docs");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "document = \"$MDVIEW_TEST_DOCS/readme.md\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(config.document, Some(PathBuf::from("/custom/docs/readme.md")));

        unsafe {
            env::remove_var("MDVIEW_TEST_DOCS");
        }
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "width = 0\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWidth { .. }));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "width = \"wide\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
