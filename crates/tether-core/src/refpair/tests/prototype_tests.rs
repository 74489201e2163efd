#![cfg(test)]

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::component::context::ComponentContext;
use crate::refpair::{PrototypeRefPair, RefPair, RefPairState};
use crate::registry::{InMemoryServiceRegistry, RegistryError, ServiceObject, ServiceReference, ServiceRegistry};
use crate::tests::integration::common::{registry_with_factory, service, test_context};

/// Registry pausing the first release until the test lets it continue
struct GatedRegistry {
    inner: Arc<InMemoryServiceRegistry>,
    gate: Mutex<Option<(Sender<()>, Receiver<()>)>>,
}

impl ServiceRegistry for GatedRegistry {
    fn get_service(&self, reference: &ServiceReference, context: &ComponentContext) -> Result<ServiceObject, RegistryError> {
        self.inner.get_service(reference, context)
    }

    fn unget_service(&self, reference: &ServiceReference, service: &ServiceObject) -> Result<(), RegistryError> {
        let gate = self.gate.lock().take();
        if let Some((started, resume)) = gate {
            started.send(()).expect("test side hung up");
            resume.recv().expect("test side hung up");
        }
        self.inner.unget_service(reference, service)
    }
}

#[test]
fn test_each_context_gets_its_own_instance() {
    let (registry, reference) = registry_with_factory("demo.Session");
    let pair = PrototypeRefPair::new(reference.clone(), registry.clone());
    let (a, _) = test_context("a");
    let (b, _) = test_context("b");

    assert!(pair.acquire(&a));
    assert!(pair.acquire(&b));
    let sa = pair.get(&a).expect("a bound");
    let sb = pair.get(&b).expect("b bound");
    assert!(!Arc::ptr_eq(&sa, &sb));
    assert_eq!(pair.bound_count(), 2);
    assert_eq!(pair.bound_contexts(), {
        let mut ids = vec![a.id(), b.id()];
        ids.sort();
        ids
    });
}

#[test]
fn test_release_single_context_keeps_others() {
    let (registry, reference) = registry_with_factory("demo.Session");
    let pair = PrototypeRefPair::new(reference.clone(), registry.clone());
    let (a, _) = test_context("a");
    let (b, _) = test_context("b");
    assert!(pair.acquire(&a));
    assert!(pair.acquire(&b));

    let released = pair.release(Some(&a)).expect("a released");
    assert!(!registry.is_outstanding(&reference, &released));
    assert_eq!(pair.state(&a), RefPairState::Unbound);
    assert_eq!(pair.state(&b), RefPairState::Bound);
    assert!(pair.release(Some(&a)).is_none());
}

#[test]
fn test_second_bind_for_same_context_is_refused() {
    let (registry, reference) = registry_with_factory("demo.Session");
    let pair = PrototypeRefPair::new(reference.clone(), registry.clone());
    let (a, _) = test_context("a");
    let first = service("first");

    assert!(pair.set_service_object(&a, first.clone()));
    assert!(!pair.set_service_object(&a, service("second")));
    assert!(pair.acquire(&a));
    assert!(Arc::ptr_eq(&pair.get(&a).expect("bound"), &first));

    let stats = registry.usage(&reference).expect("usage");
    assert_eq!((stats.gets, stats.ungets), (1, 1));
}

#[test]
fn test_full_release_spares_entry_added_during_sweep() {
    let (inner, reference) = registry_with_factory("demo.Session");
    let (started_tx, started_rx) = mpsc::channel();
    let (resume_tx, resume_rx) = mpsc::channel();
    let registry = Arc::new(GatedRegistry {
        inner: inner.clone(),
        gate: Mutex::new(None),
    });
    let pair = Arc::new(PrototypeRefPair::new(reference.clone(), registry.clone()));

    let contexts: Vec<ComponentContext> = ["a", "b", "c"].iter().map(|n| test_context(n).0).collect();
    for ctx in &contexts {
        assert!(pair.acquire(ctx));
    }
    let originals: Vec<ServiceObject> = contexts.iter().map(|c| pair.get(c).expect("bound")).collect();
    *registry.gate.lock() = Some((started_tx, resume_rx));

    let sweeper = {
        let pair = pair.clone();
        thread::spawn(move || pair.release(None))
    };

    // The sweep has drained the map and is blocked releasing its first entry.
    started_rx.recv().expect("sweep never started");
    let (d, _) = test_context("d");
    assert!(pair.acquire(&d));
    resume_tx.send(()).expect("sweeper hung up");
    assert!(sweeper.join().expect("sweeper panicked").is_none());

    for (ctx, original) in contexts.iter().zip(&originals) {
        assert!(pair.get(ctx).is_none());
        assert!(!inner.is_outstanding(&reference, original));
    }
    let survivor = pair.get(&d).expect("d survives the sweep");
    assert!(inner.is_outstanding(&reference, &survivor));
    assert_eq!(pair.bound_count(), 1);

    let stats = inner.usage(&reference).expect("usage");
    assert_eq!((stats.gets, stats.ungets, stats.outstanding), (4, 3, 1));
}
