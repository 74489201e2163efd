//! # Tether Core Registry Boundary
//!
//! The collaborator registry is external to the engine: it decides which
//! collaborators exist and hands out instances on request. This module only
//! defines the contract the engine consumes ([`ServiceRegistry`]), the
//! candidate descriptor ([`ServiceReference`]) and an in-memory reference
//! implementation ([`InMemoryServiceRegistry`]) used by hosts and tests.
//!
//! Releasing an instance twice is reported as
//! [`RegistryError::AlreadyReleased`]; the engine treats that as a no-op.
pub mod error;
pub mod memory;
pub mod reference;

use std::any::Any;
use std::sync::Arc;

use crate::component::context::ComponentContext;

pub use error::RegistryError;
pub use memory::InMemoryServiceRegistry;
pub use reference::{ServiceId, ServiceProperties, ServiceReference};

/// A collaborator instance handed out by the registry
pub type ServiceObject = Arc<dyn Any + Send + Sync>;

/// Contract of the external collaborator registry
pub trait ServiceRegistry: Send + Sync {
    /// Obtain an instance for `reference` on behalf of `context`.
    ///
    /// May block for as long as the registry needs.
    fn get_service(
        &self,
        reference: &ServiceReference,
        context: &ComponentContext,
    ) -> Result<ServiceObject, RegistryError>;

    /// Hand an instance previously obtained through [`get_service`](Self::get_service) back.
    fn unget_service(
        &self,
        reference: &ServiceReference,
        service: &ServiceObject,
    ) -> Result<(), RegistryError>;
}

/// Downcast a service object to its concrete type
pub fn downcast_service<T: Any + Send + Sync>(service: &ServiceObject) -> Option<Arc<T>> {
    Arc::downcast::<T>(service.clone()).ok()
}
