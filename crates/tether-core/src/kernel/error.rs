//! # Tether Core Kernel Errors
//!
//! Defines the crate-wide [`Error`] type.
//!
//! Subsystems keep their own typed errors ([`RegistryError`], [`ConfigError`])
//! and convert into [`Error`] through `#[from]`. Note that callback failures are
//! never surfaced through this type: the dispatch layer converts them into
//! [`MethodResult`](crate::inject::MethodResult) payloads instead.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::inject::error::CallbackError;
use crate::registry::error::RegistryError;

/// Crate-wide error type
#[derive(Debug, ThisError)]
pub enum Error {
    /// Typed registry error
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Typed configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A component declaration failed validation.
    #[error("Invalid metadata for component '{component}': {message}")]
    InvalidMetadata { component: String, message: String },

    /// One declared parameter slot of a bind callback could not be filled.
    #[error("Parameter {index} for reference '{reference}' could not be resolved: {message}")]
    ParameterResolution {
        reference: String,
        index: usize,
        message: String,
    },

    /// The component manager failed (or panicked) while constructing an instance.
    #[error("Construction of component '{component}' failed: {source}")]
    Construction {
        component: String,
        #[source]
        source: CallbackError,
    },

    /// The method table was used before `init_component_methods` ran.
    #[error("Component methods for '{component}' have not been initialized")]
    MethodsNotInitialized { component: String },

    /// A reference name not present in the component declaration.
    #[error("Component '{component}' declares no reference named '{reference}'")]
    UnknownReference { component: String, reference: String },

    /// Error raised by the activation driver outside of callback dispatch.
    #[error("Activation error for component '{component}': {message}")]
    Activation { component: String, message: String },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Helper for metadata validation failures
    pub fn invalid_metadata(component: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidMetadata {
            component: component.into(),
            message: message.into(),
        }
    }
}
