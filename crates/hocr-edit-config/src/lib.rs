use hocr_edit_syntax::{Dialect, UnknownDialect};
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

    #[error("Invalid dialect in config file at {config_path}: {source}")]
    InvalidDialect {
        config_path: PathBuf,
        source: UnknownDialect,
    },
}

/// User settings for the `hocr-edit` tool. Every field is optional in the
/// file; missing ones take the hOCR defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Class token that marks word elements
    pub word_class: String,
    /// Class token that marks page elements
    pub page_class: String,
    /// Force a dialect (`tag-soup` or `strict-xml`) instead of sniffing it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    /// When set, the original file is copied to `<file><suffix>` before an
    /// edit is written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_suffix: Option<String>,
    /// Directory scanned by `hocr-edit list` when none is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hocr_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_class: "ocrx_word".to_string(),
            page_class: "ocr_page".to_string(),
            dialect: None,
            backup_suffix: None,
            hocr_dir: None,
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

        if let Some(name) = &config.dialect {
            name.parse::<Dialect>()
                .map_err(|source| ConfigError::InvalidDialect {
                    config_path: config_path.to_path_buf(),
                    source,
                })?;
        }

        // Expand shell variables and tilde in the scan directory
        config.hocr_dir = config
            .hocr_dir
            .map(|dir| Self::expand_path(&dir).unwrap_or(dir));

        Ok(Some(config))
    }

    /// Load from [`Config::config_path`].
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

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/hocr-edit");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
