use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwapOption;
use log::Level;

use crate::component::context::{ComponentContext, ContextId};
use crate::refpair::{RefPair, return_service};
use crate::registry::{ServiceObject, ServiceReference, ServiceRegistry};

struct Binding {
    owner: ContextId,
    service: ServiceObject,
}

/// Binding state for a reference sharing one instance.
pub struct SingleRefPair {
    reference: ServiceReference,
    registry: Arc<dyn ServiceRegistry>,
    slot: ArcSwapOption<Binding>,
    failed: AtomicBool,
}

impl SingleRefPair {
    pub fn new(reference: ServiceReference, registry: Arc<dyn ServiceRegistry>) -> Self {
        Self {
            reference,
            registry,
            slot: ArcSwapOption::empty(),
            failed: AtomicBool::new(false),
        }
    }

    /// Bind `service` if nothing is bound yet. Returns whether this call won.
    pub fn set_service_object(&self, context: &ComponentContext, service: ServiceObject) -> bool {
        let empty: Option<Arc<Binding>> = None;
        let binding = Arc::new(Binding {
            owner: context.id(),
            service,
        });
        let previous = self.slot.compare_and_swap(&empty, Some(binding));
        self.failed.store(false, Ordering::Release);
        previous.is_none()
    }

    /// Context that bound the current instance
    pub fn owner(&self) -> Option<ContextId> {
        self.slot.load_full().map(|b| b.owner)
    }

    fn take_if_owned_by(&self, context: &ComponentContext) -> Option<Arc<Binding>> {
        let current = self.slot.load_full();
        match &current {
            Some(binding) if binding.owner == context.id() => {}
            _ => return None,
        }
        let none: Option<Arc<Binding>> = None;
        let previous = self.slot.compare_and_swap(&current, none);
        let swapped = match (&*previous, &current) {
            (Some(prev), Some(cur)) => Arc::ptr_eq(prev, cur),
            _ => false,
        };
        if swapped { current } else { None }
    }
}

impl RefPair for SingleRefPair {
    fn reference(&self) -> &ServiceReference {
        &self.reference
    }

    fn acquire(&self, context: &ComponentContext) -> bool {
        let service = match self.registry.get_service(&self.reference, context) {
            Ok(service) => service,
            Err(e) => {
                self.failed.store(true, Ordering::Release);
                context.logger().log(
                    Level::Warn,
                    format_args!("Could not get service from ref {}", self.reference),
                    Some(&e),
                );
                return false;
            }
        };
        if !self.set_service_object(context, service.clone()) {
            // Another caller bound first; hand our instance back.
            return_service(self.registry.as_ref(), &self.reference, &service, Some(context.logger()));
        }
        true
    }

    fn get(&self, _context: &ComponentContext) -> Option<ServiceObject> {
        self.slot.load_full().map(|b| b.service.clone())
    }

    fn release(&self, context: Option<&ComponentContext>) -> Option<ServiceObject> {
        let binding = match context {
            None => self.slot.swap(None)?,
            Some(ctx) => self.take_if_owned_by(ctx)?,
        };
        return_service(
            self.registry.as_ref(),
            &self.reference,
            &binding.service,
            context.map(|c| c.logger()),
        );
        Some(binding.service.clone())
    }

    fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    fn bound_count(&self) -> usize {
        usize::from(self.slot.load_full().is_some())
    }
}

impl fmt::Debug for SingleRefPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleRefPair")
            .field("reference", &self.reference)
            .field("owner", &self.owner())
            .field("failed", &self.is_failed())
            .finish()
    }
}
