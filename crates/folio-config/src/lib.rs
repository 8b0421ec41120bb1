use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

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
}

/// Editor configuration.
///
/// Every section has serde defaults, so a file only needs the keys it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: StyleDefaults,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// Schema defaults used when neither a mark nor an enclosing block sets a value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    pub font_family: String,
    pub font_size: String,
    pub color: Option<String>,
    pub alignment: String,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            font_family: "Times New Roman".to_string(),
            font_size: "12pt".to_string(),
            color: None,
            alignment: "left".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo levels (0 = unlimited)
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// Annotation category with its display color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub id: String,
    pub name: String,
    pub color: String,
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

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

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
        let config_dir = shellexpand::tilde("~/.config/folio");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Look up a category by id
    pub fn category(&self, id: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|category| category.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/folio/config.toml"));
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.defaults.font_family, "Times New Roman");
        assert_eq!(config.defaults.font_size, "12pt");
        assert_eq!(config.defaults.alignment, "left");
        assert_eq!(config.defaults.color, None);
        assert_eq!(config.history.max_depth, 100);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            defaults: StyleDefaults {
                font_family: "Garamond".to_string(),
                ..StyleDefaults::default()
            },
            history: HistoryConfig { max_depth: 10 },
            categories: vec![CategoryConfig {
                id: "philology".to_string(),
                name: "Philology".to_string(),
                color: "#aa3300".to_string(),
            }],
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config_content = r#"
[defaults]
font_size = "14pt"
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.defaults.font_size, "14pt");
        assert_eq!(config.defaults.font_family, "Times New Roman");
        assert_eq!(config.history, HistoryConfig::default());
    }

    #[test]
    fn test_categories_from_toml() {
        let config_content = r##"
[[categories]]
id = "textual"
name = "Textual note"
color = "#ffcc00"

[[categories]]
id = "historical"
name = "Historical note"
color = "#0066cc"
"##;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.category("historical").unwrap().color, "#0066cc");
        assert!(config.category("missing").is_none());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "defaults = [not valid").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            history: HistoryConfig { max_depth: 5 },
            ..Config::default()
        };

        // Parent directories are created on save
        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
