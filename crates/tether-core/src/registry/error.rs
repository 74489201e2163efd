//! # Tether Core Registry Errors
//!
//! Errors reported by a [`ServiceRegistry`](super::ServiceRegistry)
//! implementation. The engine never propagates these past its own boundary:
//! acquisition failures mark the binding as failed and release failures are
//! logged.
use thiserror::Error;

use crate::registry::reference::ServiceId;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Service {service_id} is not known to the registry")]
    UnknownReference { service_id: ServiceId },

    #[error("Service {service_id} has been unregistered")]
    Unregistered { service_id: ServiceId },

    #[error("Service {service_id} instance was already released")]
    AlreadyReleased { service_id: ServiceId },

    #[error("Service {service_id} could not produce an instance: {message}")]
    NoInstance { service_id: ServiceId, message: String },
}

impl RegistryError {
    /// Whether this error only reports a redundant release
    pub fn is_already_released(&self) -> bool {
        matches!(self, RegistryError::AlreadyReleased { .. })
    }
}
