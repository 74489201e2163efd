#![cfg(test)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use log::Level;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::component::context::ComponentContext;
use crate::component::manager::{CallbackResult, ComponentInstance, ComponentManager, DeactivationReason, ReturnValue};
use crate::inject::error::CallbackError;
use crate::inject::parameters::{ParameterShape, ParameterValue, Parameters};
use crate::kernel::logger::ComponentLogger;
use crate::registry::{InMemoryServiceRegistry, ServiceObject, ServiceProperties};

// ===== LOGGING =====

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub cause: Option<String>,
}

/// Logger keeping every entry for inspection
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }
}

impl ComponentLogger for RecordingLogger {
    fn log(&self, level: Level, args: fmt::Arguments<'_>, cause: Option<&(dyn StdError + 'static)>) {
        self.entries.lock().push(LogEntry {
            level,
            message: args.to_string(),
            cause: cause.map(|c| c.to_string()),
        });
    }
}

/// Fresh context for `component` with a recording logger
pub fn test_context(component: &str) -> (ComponentContext, Arc<RecordingLogger>) {
    let logger = RecordingLogger::new();
    let context = ComponentContext::new(component, logger.clone());
    (context, logger)
}

// ===== SERVICES =====

/// Collaborator handed out by test registries
#[derive(Debug)]
pub struct TestService {
    pub label: String,
}

pub fn service(label: &str) -> ServiceObject {
    Arc::new(TestService {
        label: label.to_string(),
    })
}

pub fn properties(pairs: &[(&str, Value)]) -> ServiceProperties {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Registry plus one factory registration producing a fresh `TestService` per request
pub fn registry_with_factory(interface: &str) -> (Arc<InMemoryServiceRegistry>, crate::registry::ServiceReference) {
    let registry = Arc::new(InMemoryServiceRegistry::new());
    let reference = registry.register_factory(interface, properties(&[("name", json!(interface))]), |ctx| {
        Some(service(ctx.component_name()))
    });
    (registry, reference)
}

// ===== COMPONENT MANAGER =====

/// Component instance built by [`MockComponentManager`]
#[derive(Debug, Default)]
pub struct Greeter {
    /// Bound collaborators per bind callback name
    pub bound: Mutex<HashMap<String, Vec<ServiceObject>>>,
    pub initialized_fields: Mutex<Vec<String>>,
}

impl Greeter {
    pub fn bound_count(&self, name: &str) -> usize {
        self.bound.lock().get(name).map(Vec::len).unwrap_or(0)
    }
}

#[derive(Debug)]
struct MockFailure(String);

impl fmt::Display for MockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for MockFailure {}

/// Component manager recording every call.
///
/// Bind-style callbacks resolve the shapes registered with
/// [`with_shapes`](Self::with_shapes) (default: a single service) and store
/// the resolved arguments.
#[derive(Default)]
pub struct MockComponentManager {
    calls: Mutex<Vec<String>>,
    resolved: Mutex<Vec<(String, Vec<ParameterValue>)>>,
    shapes: HashMap<String, Vec<ParameterShape>>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
    refuse_construct: bool,
    refuse_init: bool,
}

impl MockComponentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shapes(mut self, name: &str, shapes: &[ParameterShape]) -> Self {
        self.shapes.insert(name.to_string(), shapes.to_vec());
        self
    }

    /// Callback `name` returns an error
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Callback `name` panics
    pub fn panicking(mut self, name: &str) -> Self {
        self.panicking.insert(name.to_string());
        self
    }

    pub fn refusing_construct(mut self) -> Self {
        self.refuse_construct = true;
        self
    }

    pub fn refusing_init(mut self) -> Self {
        self.refuse_init = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn resolved(&self) -> Vec<(String, Vec<ParameterValue>)> {
        self.resolved.lock().clone()
    }

    fn enter(&self, kind: &str, name: &str) -> Result<(), CallbackError> {
        self.calls.lock().push(format!("{}:{}", kind, name));
        if self.panicking.contains(name) {
            panic!("{} '{}' exploded", kind, name);
        }
        if self.failing.contains(name) {
            return Err(Box::new(MockFailure(format!("{} '{}' failed", kind, name))));
        }
        Ok(())
    }

    fn greeter(instance: &ComponentInstance) -> Result<&Greeter, CallbackError> {
        instance
            .downcast_ref::<Greeter>()
            .ok_or_else(|| "instance is not a Greeter".into())
    }

    fn resolve(&self, name: &str, parameters: &dyn Parameters) -> Result<Vec<ParameterValue>, CallbackError> {
        let shapes = self
            .shapes
            .get(name)
            .cloned()
            .unwrap_or_else(|| vec![ParameterShape::Service]);
        let values = parameters.get_parameters(&shapes)?;
        self.resolved.lock().push((name.to_string(), values.clone()));
        Ok(values)
    }
}

impl ComponentManager for MockComponentManager {
    fn construct(&self, context: &ComponentContext) -> Result<ComponentInstance, CallbackError> {
        self.calls.lock().push(format!("construct:{}", context.component_name()));
        if self.refuse_construct {
            return Err("constructor refused".into());
        }
        Ok(Arc::new(Greeter::default()))
    }

    fn init(&self, instance: &ComponentInstance, field: &str) -> bool {
        self.calls.lock().push(format!("init:{}", field));
        if self.refuse_init {
            return false;
        }
        match Self::greeter(instance) {
            Ok(greeter) => {
                greeter.initialized_fields.lock().push(field.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn bind(&self, instance: &ComponentInstance, name: &str, parameters: &dyn Parameters) -> CallbackResult {
        self.enter("bind", name)?;
        let values = self.resolve(name, parameters)?;
        let greeter = Self::greeter(instance)?;
        let mut bound = greeter.bound.lock();
        let slot = bound.entry(name.to_string()).or_default();
        slot.extend(values.iter().filter_map(|v| v.as_service().cloned()));
        Ok(ReturnValue::Void)
    }

    fn unbind(&self, instance: &ComponentInstance, name: &str, parameters: &dyn Parameters) -> CallbackResult {
        self.enter("unbind", name)?;
        let values = self.resolve(name, parameters)?;
        let greeter = Self::greeter(instance)?;
        // Unbind names differ from bind names; drop the instance wherever it was bound.
        for slot in greeter.bound.lock().values_mut() {
            for value in values.iter().filter_map(ParameterValue::as_service) {
                slot.retain(|s| !Arc::ptr_eq(s, value));
            }
        }
        Ok(ReturnValue::Void)
    }

    fn updated(&self, _instance: &ComponentInstance, name: &str, parameters: &dyn Parameters) -> CallbackResult {
        self.enter("updated", name)?;
        let properties = parameters.reference().properties().to_map();
        Ok(ReturnValue::Value(Some(properties)))
    }

    fn activate(&self, _instance: &ComponentInstance, context: &ComponentContext) -> CallbackResult {
        self.enter("activate", "activate")?;
        let mut result = BTreeMap::new();
        result.insert("component".to_string(), json!(context.component_name()));
        Ok(ReturnValue::Value(Some(result)))
    }

    fn deactivate(
        &self,
        _instance: &ComponentInstance,
        _context: &ComponentContext,
        reason: DeactivationReason,
    ) -> CallbackResult {
        self.calls.lock().push(format!("reason:{}", reason.code()));
        self.enter("deactivate", "deactivate")?;
        Ok(ReturnValue::Void)
    }

    fn modified(&self, _instance: &ComponentInstance, _context: &ComponentContext) -> CallbackResult {
        self.enter("modified", "modified")?;
        Ok(ReturnValue::Void)
    }
}
