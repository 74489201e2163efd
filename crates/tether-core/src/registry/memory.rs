use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::component::context::ComponentContext;
use crate::registry::error::RegistryError;
use crate::registry::reference::{ServiceId, ServiceProperties, ServiceReference};
use crate::registry::{ServiceObject, ServiceRegistry};

type ServiceFactory = dyn Fn(&ComponentContext) -> Option<ServiceObject> + Send + Sync;

enum ServiceSource {
    /// Every `get_service` hands out the same instance
    Singleton(ServiceObject),
    /// Every `get_service` asks the factory for a new instance
    Factory(Arc<ServiceFactory>),
}

struct Registration {
    reference: ServiceReference,
    source: ServiceSource,
    unregistered: bool,
    /// Instances handed out and not yet returned
    outstanding: Vec<ServiceObject>,
    gets: u64,
    ungets: u64,
}

/// Usage counters for one registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageStats {
    pub gets: u64,
    pub ungets: u64,
    pub outstanding: usize,
}

/// In-memory [`ServiceRegistry`] with per-registration usage tracking.
///
/// Returning an instance that is not outstanding yields
/// [`RegistryError::AlreadyReleased`].
pub struct InMemoryServiceRegistry {
    next_id: AtomicU64,
    registrations: RwLock<HashMap<ServiceId, Mutex<Registration>>>,
}

impl InMemoryServiceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            registrations: RwLock::new(HashMap::new()),
        }
    }

    fn register(&self, interface: &str, properties: ServiceProperties, source: ServiceSource) -> ServiceReference {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let reference = ServiceReference::new(id, interface, properties);
        let registration = Registration {
            reference: reference.clone(),
            source,
            unregistered: false,
            outstanding: Vec::new(),
            gets: 0,
            ungets: 0,
        };
        self.registrations.write().insert(id, Mutex::new(registration));
        log::debug!("Registered service {}", reference);
        reference
    }

    /// Register one shared instance
    pub fn register_singleton(
        &self,
        interface: &str,
        properties: ServiceProperties,
        service: ServiceObject,
    ) -> ServiceReference {
        self.register(interface, properties, ServiceSource::Singleton(service))
    }

    /// Register a factory producing a fresh instance per request.
    /// Returning `None` from the factory makes the request fail.
    pub fn register_factory<F>(&self, interface: &str, properties: ServiceProperties, factory: F) -> ServiceReference
    where
        F: Fn(&ComponentContext) -> Option<ServiceObject> + Send + Sync + 'static,
    {
        self.register(interface, properties, ServiceSource::Factory(Arc::new(factory)))
    }

    /// Withdraw a registration; later requests fail, releases are still accepted.
    /// The registration is dropped once no instance is outstanding.
    pub fn unregister(&self, reference: &ServiceReference) -> Result<(), RegistryError> {
        {
            let registrations = self.registrations.read();
            let registration = registrations
                .get(&reference.id())
                .ok_or(RegistryError::UnknownReference { service_id: reference.id() })?;
            registration.lock().unregistered = true;
        }
        log::debug!("Unregistered service {}", reference);
        self.remove_if_retired(reference.id());
        Ok(())
    }

    /// Drop a registration that is unregistered and has nothing outstanding
    fn remove_if_retired(&self, service_id: ServiceId) {
        let mut registrations = self.registrations.write();
        let retired = registrations.get_mut(&service_id).is_some_and(|r| {
            let r = r.get_mut();
            r.unregistered && r.outstanding.is_empty()
        });
        if retired {
            registrations.remove(&service_id);
            log::debug!("Removed retired registration {}", service_id);
        }
    }

    /// Number of registrations still held, retired ones excluded
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    /// Replace the properties of a registration; every clone of the reference sees them.
    pub fn set_properties(&self, reference: &ServiceReference, properties: ServiceProperties) -> Result<(), RegistryError> {
        let registrations = self.registrations.read();
        let registration = registrations
            .get(&reference.id())
            .ok_or(RegistryError::UnknownReference { service_id: reference.id() })?;
        registration.lock().reference.replace_properties(properties);
        Ok(())
    }

    /// Live references for an interface, highest ranking first then lowest id
    pub fn references(&self, interface: &str) -> Vec<ServiceReference> {
        let mut refs: Vec<ServiceReference> = self
            .registrations
            .read()
            .values()
            .filter_map(|r| {
                let r = r.lock();
                (!r.unregistered && r.reference.interface() == interface).then(|| r.reference.clone())
            })
            .collect();
        refs.sort_by(|a, b| b.ranking().cmp(&a.ranking()).then(a.id().cmp(&b.id())));
        refs
    }

    /// Usage counters for a registration
    pub fn usage(&self, reference: &ServiceReference) -> Option<UsageStats> {
        self.registrations.read().get(&reference.id()).map(|r| {
            let r = r.lock();
            UsageStats {
                gets: r.gets,
                ungets: r.ungets,
                outstanding: r.outstanding.len(),
            }
        })
    }

    /// Whether `service` is currently handed out for `reference`
    pub fn is_outstanding(&self, reference: &ServiceReference, service: &ServiceObject) -> bool {
        self.registrations
            .read()
            .get(&reference.id())
            .map(|r| r.lock().outstanding.iter().any(|s| Arc::ptr_eq(s, service)))
            .unwrap_or(false)
    }
}

impl Default for InMemoryServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryServiceRegistry")
            .field("registrations", &self.registrations.read().len())
            .finish_non_exhaustive()
    }
}

impl ServiceRegistry for InMemoryServiceRegistry {
    fn get_service(
        &self,
        reference: &ServiceReference,
        context: &ComponentContext,
    ) -> Result<ServiceObject, RegistryError> {
        let service_id = reference.id();
        let source = {
            let registrations = self.registrations.read();
            let registration = registrations
                .get(&service_id)
                .ok_or(RegistryError::UnknownReference { service_id })?;
            let registration = registration.lock();
            if registration.unregistered {
                return Err(RegistryError::Unregistered { service_id });
            }
            match &registration.source {
                ServiceSource::Singleton(service) => ServiceSource::Singleton(service.clone()),
                ServiceSource::Factory(factory) => ServiceSource::Factory(factory.clone()),
            }
        };
        // Factories run without any registry lock held.
        let produced = match source {
            ServiceSource::Singleton(service) => Some(service),
            ServiceSource::Factory(factory) => factory(context),
        };
        let service = produced.ok_or_else(|| RegistryError::NoInstance {
            service_id,
            message: format!("no instance available for component '{}'", context.component_name()),
        })?;

        let registrations = self.registrations.read();
        let registration = registrations
            .get(&service_id)
            .ok_or(RegistryError::UnknownReference { service_id })?;
        let mut registration = registration.lock();
        registration.gets += 1;
        registration.outstanding.push(service.clone());
        Ok(service)
    }

    fn unget_service(
        &self,
        reference: &ServiceReference,
        service: &ServiceObject,
    ) -> Result<(), RegistryError> {
        let service_id = reference.id();
        let retired = {
            let registrations = self.registrations.read();
            let registration = registrations
                .get(&service_id)
                .ok_or(RegistryError::UnknownReference { service_id })?;
            let mut registration = registration.lock();
            let index = registration
                .outstanding
                .iter()
                .position(|s| Arc::ptr_eq(s, service))
                .ok_or(RegistryError::AlreadyReleased { service_id })?;
            registration.outstanding.swap_remove(index);
            registration.ungets += 1;
            registration.unregistered && registration.outstanding.is_empty()
        };
        if retired {
            self.remove_if_retired(service_id);
        }
        Ok(())
    }
}
