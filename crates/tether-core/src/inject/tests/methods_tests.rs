#![cfg(test)]

use std::sync::{Arc, Barrier};
use std::thread;

use log::Level;
use semver::Version;

use crate::component::manager::ComponentManager;
use crate::component::metadata::{ComponentMetadata, ReferenceMetadata};
use crate::inject::methods::{ComponentManagerMethods, ComponentMethods};
use crate::tests::integration::common::{MockComponentManager, RecordingLogger};

fn metadata() -> ComponentMetadata {
    ComponentMetadata::new("greeter", "demo.Greeter")
        .with_version(Version::new(1, 3, 0))
        .with_lifecycle("start", "stop")
        .with_reference(ReferenceMetadata::new("logger", "demo.Logger").with_bind("setLogger", "unsetLogger"))
        .with_reference(ReferenceMetadata::new("plain", "demo.Plain"))
        .with_reference(ReferenceMetadata::new("other", "demo.Other"))
        .with_reference(ReferenceMetadata::new("session", "demo.Session").with_field("session"))
}

fn methods() -> ComponentManagerMethods {
    ComponentManagerMethods::new(Arc::new(MockComponentManager::new()))
}

#[test]
fn test_getters_empty_before_init() {
    let methods = methods();
    assert!(!methods.is_initialized());
    assert!(methods.activate_method().is_none());
    assert!(methods.deactivate_method().is_none());
    assert!(methods.modified_method().is_none());
    assert!(methods.bind_methods("logger").is_none());
    assert!(methods.constructor().is_none());
    assert!(methods.reference_names().is_empty());
}

#[test]
fn test_init_builds_full_table() {
    let methods = methods();
    let logger = RecordingLogger::new();
    methods.init_component_methods(&metadata(), "demo.Greeter", logger.as_ref());

    assert!(methods.is_initialized());
    assert!(methods.activate_method().is_some());
    assert!(methods.modified_method().is_some());
    assert_eq!(methods.reference_names(), vec!["logger", "other", "plain", "session"]);
    assert!(methods.bind_methods("missing").is_none());
    assert!(methods.bind_methods("session").expect("session").init().is_some());
    assert!(methods.bind_methods("logger").expect("logger").init().is_none());

    let constructor = methods.constructor().expect("constructor");
    assert_eq!(constructor.component(), "greeter");
    assert_eq!(constructor.implementation(), "demo.Greeter");
    assert!(logger.entries().is_empty());
}

#[test]
fn test_references_without_callbacks_share_nop_methods() {
    let methods = methods();
    methods.init_component_methods(&metadata(), "demo.Greeter", RecordingLogger::new().as_ref());

    let plain = methods.bind_methods("plain").expect("plain");
    let other = methods.bind_methods("other").expect("other");
    let logger = methods.bind_methods("logger").expect("logger");
    assert!(Arc::ptr_eq(&plain, &other));
    assert!(!Arc::ptr_eq(&plain, &logger));
}

#[test]
fn test_second_init_is_a_logged_no_op() {
    let methods = methods();
    let logger = RecordingLogger::new();
    methods.init_component_methods(&metadata(), "demo.Greeter", logger.as_ref());
    let first = methods.activate_method().expect("activate");

    let other = ComponentMetadata::new("renamed", "demo.Other");
    methods.init_component_methods(&other, "demo.Other", logger.as_ref());
    let second = methods.activate_method().expect("activate");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(methods.constructor().expect("constructor").component(), "greeter");
    assert_eq!(
        logger.messages_at(Level::Debug),
        vec!["Component methods for greeter already initialized".to_string()]
    );
}

#[test]
fn test_concurrent_init_builds_once() {
    const THREADS: usize = 8;
    let methods = Arc::new(methods());
    let logger = RecordingLogger::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let activates: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let methods = methods.clone();
                let logger = logger.clone();
                let barrier = barrier.clone();
                scope.spawn(move || {
                    barrier.wait();
                    methods.init_component_methods(&metadata(), "demo.Greeter", logger.as_ref());
                    methods.activate_method().expect("activate")
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("builder panicked")).collect()
    });

    assert!(activates.iter().all(|a| Arc::ptr_eq(a, &activates[0])));
    assert_eq!(logger.messages_at(Level::Debug).len(), THREADS - 1);
}

#[test]
fn test_from_factory() {
    let factory = |name: &str| -> Option<Arc<dyn ComponentManager>> {
        (name == "greeter").then(|| Arc::new(MockComponentManager::new()) as Arc<dyn ComponentManager>)
    };
    assert!(ComponentManagerMethods::from_factory(&factory, "greeter").is_some());
    assert!(ComponentManagerMethods::from_factory(&factory, "other").is_none());
}
