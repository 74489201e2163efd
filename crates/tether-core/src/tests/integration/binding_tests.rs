#![cfg(test)]

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use log::LevelFilter;
use serde_json::json;
use tempfile::tempdir;

use crate::activation::ComponentActivation;
use crate::component::context::ComponentContext;
use crate::component::manager::{ComponentManager, DeactivationReason};
use crate::component::metadata::ComponentMetadata;
use crate::config::{self, EngineConfig};
use crate::inject::methods::{ComponentManagerMethods, ComponentMethods};
use crate::inject::parameters::ParameterShape;
use crate::kernel::error::Result;
use crate::metadata::{BundleKey, ComponentMetadataStore};
use crate::registry::InMemoryServiceRegistry;
use crate::resolver::CandidateMap;

use super::common::{properties, service, MockComponentManager, TestService};

const DESCRIPTOR: &str = r#"{
    "name": "greeter",
    "implementation": "demo.Greeter",
    "version": "1.3.0",
    "activate": "start",
    "deactivate": "stop",
    "reference": [
        {"name": "audit", "interface": "demo.Audit", "cardinality": "0..1", "bind": "setAudit", "unbind": "unsetAudit"},
        {"name": "logger", "interface": "demo.Logger", "bind": "setLogger", "unbind": "unsetLogger"}
    ]
}"#;

#[test]
fn test_descriptor_to_teardown() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp directory");
    let engine_path = dir.path().join("engine.toml");
    fs::write(&engine_path, "log_level = \"trace\"\ncache_metadata = true\n").expect("Failed to write engine config");
    let descriptor_path = dir.path().join("greeter.json");
    fs::write(&descriptor_path, DESCRIPTOR).expect("Failed to write descriptor");

    let engine = EngineConfig::from_path(&engine_path)?;
    assert_eq!(engine.max_level(), LevelFilter::Trace);

    let metadata: ComponentMetadata = config::read_file(&descriptor_path)?;
    metadata.validate()?;
    let store = ComponentMetadataStore::from_config(&engine);
    let key = BundleKey::new(11, 1_700_000_000);
    store.add_metadata(key, vec![metadata]);
    let cached = store.get_metadata(&key).expect("cached descriptor");
    let metadata = cached[0].clone();

    // Shapes of the logger callback are declared in an order unrelated to the references'.
    let manager = Arc::new(MockComponentManager::new().with_shapes(
        "setLogger",
        &[ParameterShape::ServiceReference, ParameterShape::Properties, ParameterShape::Service],
    ));
    let shared = manager.clone();
    let factory = move |name: &str| -> Option<Arc<dyn ComponentManager>> {
        (name == "greeter").then(|| shared.clone() as Arc<dyn ComponentManager>)
    };
    let methods: Arc<dyn ComponentMethods> =
        Arc::new(ComponentManagerMethods::from_factory(&factory, &metadata.name).expect("manager for greeter"));

    let registry = Arc::new(InMemoryServiceRegistry::new());
    let logger_instance = service("console");
    let logger_ref = registry.register_singleton(
        "demo.Logger",
        properties(&[("format", json!("plain"))]),
        logger_instance.clone(),
    );
    let audit_ref = registry.register_singleton("demo.Audit", properties(&[]), service("audit"));

    let mut candidates = CandidateMap::new();
    candidates.insert("logger", registry.references("demo.Logger"));
    candidates.insert("audit", registry.references("demo.Audit"));

    let context = ComponentContext::new(&metadata.name, engine.logger_for(&metadata.name));
    let activation = ComponentActivation::new(metadata, registry.clone(), context);
    let report = activation.activate(methods, &candidates)?;
    assert_eq!(report.bound(), 2);
    assert_eq!(report.references()[0].name, "audit");

    let resolved = manager.resolved();
    let (name, values) = resolved.iter().find(|(name, _)| name == "setLogger").expect("logger bind");
    assert_eq!(name, "setLogger");
    assert_eq!(values.len(), 3);
    assert_eq!(values[0].as_reference(), Some(&logger_ref));
    assert_eq!(values[1].as_properties().and_then(|p| p.get("format")), Some(&json!("plain")));
    let bound = values[2].as_service().expect("service argument");
    assert!(Arc::ptr_eq(bound, &logger_instance));
    assert_eq!(
        crate::registry::downcast_service::<TestService>(bound).expect("TestService").label,
        "console"
    );

    activation.deactivate(DeactivationReason::Disposed)?;
    assert_eq!(registry.usage(&logger_ref).expect("usage").outstanding, 0);
    assert_eq!(registry.usage(&audit_ref).expect("usage").outstanding, 0);

    let current: HashSet<BundleKey> = HashSet::new();
    assert_eq!(store.retain_current(&current), 1);
    Ok(())
}

#[test]
fn test_shared_candidates_survive_map_clone() -> Result<()> {
    let registry = Arc::new(InMemoryServiceRegistry::new());
    let first = registry.register_singleton("demo.Logger", properties(&[]), service("first"));
    let second = registry.register_singleton("demo.Logger", properties(&[]), service("second"));

    let mut candidates = CandidateMap::new();
    let shared = candidates.insert("logger", vec![first.clone(), second.clone()]);
    candidates.insert_shared("audit", shared);

    // A trial copy may skip candidates without touching the original map.
    let trial = candidates.deep_clone(true);
    trial.get("logger").expect("logger").lock().remove_current();
    assert_eq!(trial.get("audit").expect("audit").lock().current(), Some(&second));
    assert_eq!(candidates.get("audit").expect("audit").lock().current(), Some(&first));
    Ok(())
}
