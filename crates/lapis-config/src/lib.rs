use lapis_engine::{CoordinatorOptions, DEFAULT_ATTRIBUTE_NAME, Validation};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
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

    #[error("Invalid attribute name `{0}`: expected a lowercase `data-*` attribute")]
    InvalidAttributeName(String),

    #[error("Root id must not be empty")]
    EmptyRootId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Attribute carrying node ids on rendered elements
    #[serde(default = "default_attribute_name")]
    pub attribute_name: String,
    #[serde(default = "default_root_id")]
    pub root_id: String,
    /// Content loaded at startup (`.toml` or `.md`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_path: Option<PathBuf>,
    #[serde(default)]
    pub validation: Validation,
}

fn default_attribute_name() -> String {
    DEFAULT_ATTRIBUTE_NAME.to_string()
}

fn default_root_id() -> String {
    "root".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attribute_name: default_attribute_name(),
            root_id: default_root_id(),
            content_path: None,
            validation: Validation::default(),
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

        // Expand shell variables and tilde in the content path
        config.content_path = config
            .content_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        config.validate()?;
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
        let config_dir = shellexpand::tilde("~/.config/lapis");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !attribute_name_regex().is_match(&self.attribute_name) {
            return Err(ConfigError::InvalidAttributeName(
                self.attribute_name.clone(),
            ));
        }
        if self.root_id.trim().is_empty() {
            return Err(ConfigError::EmptyRootId);
        }
        Ok(())
    }

    /// Coordinator options for this configuration, without default content
    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions::new(self.root_id.as_str())
            .with_attribute_name(self.attribute_name.as_str())
            .with_validation(self.validation)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

fn attribute_name_regex() -> &'static Regex {
    static ATTRIBUTE_NAME: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE_NAME.get_or_init(|| {
        Regex::new(r"^data-[a-z0-9][a-z0-9-]*$").expect("Invalid attribute name regex")
    })
}
