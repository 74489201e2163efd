//! # Tether Core Configuration
//!
//! Engine settings and the file formats they (and component descriptors)
//! are read from.
//!
//! ## Key Components:
//!
//! - **[`ConfigFormat`]**: JSON always; YAML and TOML behind the `yaml-config`
//!   and `toml-config` features. Selected from the file extension.
//! - **[`EngineConfig`]**: Log level of the default component logger and
//!   whether component descriptors are cached.
//! - **[`error`]**: [`ConfigError`], converted into the crate error through `#[from]`.
pub mod error;

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use log::LevelFilter;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use error::ConfigError;

use crate::kernel::logger::{ComponentLogger, FacadeLogger};

/// Supported configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// Deserialize `data` in the given format
pub fn deserialize<T: DeserializeOwned>(data: &str, format: ConfigFormat) -> Result<T, ConfigError> {
    match format {
        ConfigFormat::Json => serde_json::from_str(data).map_err(|e| ConfigError::parse("json", e)),
        #[cfg(feature = "yaml-config")]
        ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| ConfigError::parse("yaml", e)),
        #[cfg(feature = "toml-config")]
        ConfigFormat::Toml => toml::from_str(data).map_err(|e| ConfigError::parse("toml", e)),
    }
}

/// Read and deserialize a file, picking the format from its extension
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let data = fs::read_to_string(path).map_err(|e| ConfigError::io(e, path))?;
    deserialize(&data, format)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cache_metadata() -> bool {
    true
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum level emitted by the default component logger
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Keep parsed component descriptors in the metadata store
    #[serde(default = "default_cache_metadata")]
    pub cache_metadata: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            cache_metadata: default_cache_metadata(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate engine settings
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config: EngineConfig = deserialize(data, format)?;
        config.validate()?;
        Ok(config)
    }

    /// Load engine settings from a file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let config: EngineConfig = read_file(path)?;
        config.validate()?;
        log::debug!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        LevelFilter::from_str(&self.log_level).map_err(|_| ConfigError::InvalidValue {
            key: "log_level".to_string(),
            value: self.log_level.clone(),
        })?;
        Ok(())
    }

    /// Configured maximum level; `Info` if the setting does not parse
    pub fn max_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// Default logger for the named component
    pub fn logger_for(&self, component: &str) -> Arc<dyn ComponentLogger> {
        Arc::new(FacadeLogger::new(component, self.max_level()))
    }
}
