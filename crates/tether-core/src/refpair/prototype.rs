use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::Level;
use parking_lot::Mutex;

use crate::component::context::{ComponentContext, ContextId};
use crate::refpair::{RefPair, return_service};
use crate::registry::{ServiceObject, ServiceReference, ServiceRegistry};

struct PrototypeEntry {
    context: ComponentContext,
    service: ServiceObject,
}

/// Binding state for a reference obtaining one instance per activation.
pub struct PrototypeRefPair {
    reference: ServiceReference,
    registry: Arc<dyn ServiceRegistry>,
    entries: Mutex<HashMap<ContextId, PrototypeEntry>>,
    failed: AtomicBool,
}

impl PrototypeRefPair {
    pub fn new(reference: ServiceReference, registry: Arc<dyn ServiceRegistry>) -> Self {
        Self {
            reference,
            registry,
            entries: Mutex::new(HashMap::new()),
            failed: AtomicBool::new(false),
        }
    }

    /// Bind `service` for `context` if that context has nothing bound yet.
    pub fn set_service_object(&self, context: &ComponentContext, service: ServiceObject) -> bool {
        let inserted = match self.entries.lock().entry(context.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(PrototypeEntry {
                    context: context.clone(),
                    service,
                });
                true
            }
        };
        self.failed.store(false, Ordering::Release);
        inserted
    }

    /// Contexts that currently hold an instance
    pub fn bound_contexts(&self) -> Vec<ContextId> {
        let mut ids: Vec<ContextId> = self.entries.lock().keys().copied().collect();
        ids.sort();
        ids
    }

    fn release_entry(&self, entry: &PrototypeEntry) {
        return_service(
            self.registry.as_ref(),
            &self.reference,
            &entry.service,
            Some(entry.context.logger()),
        );
    }
}

impl RefPair for PrototypeRefPair {
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
                    format_args!("Could not get prototype service from ref {}", self.reference),
                    Some(&e),
                );
                return false;
            }
        };
        if !self.set_service_object(context, service.clone()) {
            // This context was bound concurrently; hand our instance back.
            return_service(self.registry.as_ref(), &self.reference, &service, Some(context.logger()));
        }
        true
    }

    fn get(&self, context: &ComponentContext) -> Option<ServiceObject> {
        self.entries.lock().get(&context.id()).map(|e| e.service.clone())
    }

    fn release(&self, context: Option<&ComponentContext>) -> Option<ServiceObject> {
        match context {
            None => {
                // Snapshot and clear under the lock, release outside it.
                let drained = std::mem::take(&mut *self.entries.lock());
                for entry in drained.values() {
                    self.release_entry(entry);
                }
                None
            }
            Some(ctx) => {
                let entry = self.entries.lock().remove(&ctx.id())?;
                self.release_entry(&entry);
                Some(entry.service)
            }
        }
    }

    fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    fn bound_count(&self) -> usize {
        self.entries.lock().len()
    }
}

impl fmt::Debug for PrototypeRefPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrototypeRefPair")
            .field("reference", &self.reference)
            .field("bound_contexts", &self.bound_contexts())
            .field("failed", &self.is_failed())
            .finish()
    }
}
