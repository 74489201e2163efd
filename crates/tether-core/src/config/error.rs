use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading engine configuration or descriptors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported configuration format for '{}'", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("I/O error reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Deserialization from '{format}' failed: {message}")]
    Parse { format: String, message: String },

    #[error("Invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(format: &str, error: impl std::fmt::Display) -> Self {
        ConfigError::Parse {
            format: format.to_string(),
            message: error.to_string(),
        }
    }
}
