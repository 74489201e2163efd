#![cfg(test)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use semver::Version;
use tokio::task;

use crate::activation::ComponentActivation;
use crate::component::manager::DeactivationReason;
use crate::component::metadata::{ComponentMetadata, ReferenceMetadata, ReferenceScope};
use crate::inject::methods::{ComponentManagerMethods, ComponentMethods};
use crate::refpair::{RefPair, SingleRefPair};
use crate::resolver::CandidateMap;

use super::common::{registry_with_factory, test_context, MockComponentManager};

fn jitter() {
    let micros = rand::thread_rng().gen_range(0..500);
    thread::sleep(Duration::from_micros(micros));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_blocking_acquirers_share_one_winner() {
    const TASKS: usize = 32;
    let (registry, reference) = registry_with_factory("demo.Logger");
    let pair = Arc::new(SingleRefPair::new(reference.clone(), registry.clone()));

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let pair = pair.clone();
            task::spawn_blocking(move || {
                let (ctx, _) = test_context("greeter");
                jitter();
                assert!(pair.acquire(&ctx));
                pair.get(&ctx).expect("bound after acquire")
            })
        })
        .collect();

    let mut seen = Vec::with_capacity(TASKS);
    for handle in handles {
        seen.push(handle.await.expect("acquirer panicked"));
    }

    assert!(seen.iter().all(|s| Arc::ptr_eq(s, &seen[0])));
    let stats = registry.usage(&reference).expect("usage");
    assert_eq!(stats.gets, TASKS as u64);
    assert_eq!(stats.ungets, TASKS as u64 - 1);
    assert!(registry.is_outstanding(&reference, &seen[0]));

    assert!(pair.release(None).is_some());
    assert_eq!(registry.usage(&reference).expect("usage").outstanding, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_activations_of_prototype_reference() {
    const ACTIVATIONS: usize = 12;
    let metadata = ComponentMetadata::new("greeter", "demo.Greeter")
        .with_version(Version::new(1, 3, 0))
        .with_lifecycle("start", "stop")
        .with_reference(
            ReferenceMetadata::new("session", "demo.Session")
                .with_scope(ReferenceScope::Prototype)
                .with_bind("setSession", "unsetSession"),
        );
    let (registry, reference) = registry_with_factory("demo.Session");
    let methods: Arc<dyn ComponentMethods> =
        Arc::new(ComponentManagerMethods::new(Arc::new(MockComponentManager::new())));
    let mut candidates = CandidateMap::new();
    candidates.insert("session", vec![reference.clone()]);
    let candidates = Arc::new(candidates);

    let handles: Vec<_> = (0..ACTIVATIONS)
        .map(|_| {
            let metadata = metadata.clone();
            let registry = registry.clone();
            let methods = methods.clone();
            let candidates = candidates.clone();
            task::spawn_blocking(move || {
                let (ctx, _) = test_context("greeter");
                let activation = ComponentActivation::new(metadata, registry, ctx);
                let report = activation.activate(methods, &candidates).expect("activation");
                assert_eq!(report.bound(), 1);
                jitter();
                activation.deactivate(DeactivationReason::Disposed).expect("deactivation");
                report.bound()
            })
        })
        .collect();

    let mut bound = 0;
    for handle in handles {
        bound += handle.await.expect("activation task panicked");
    }

    assert_eq!(bound, ACTIVATIONS);
    let stats = registry.usage(&reference).expect("usage");
    assert_eq!(stats.gets, ACTIVATIONS as u64);
    assert_eq!(stats.ungets, ACTIVATIONS as u64);
    assert_eq!(stats.outstanding, 0);
    assert!(methods.activate_method().is_some());
}
