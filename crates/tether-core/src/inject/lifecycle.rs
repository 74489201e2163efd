use std::fmt;
use std::sync::Arc;

use crate::component::context::ComponentContext;
use crate::component::manager::{CallbackResult, ComponentInstance, ComponentManager, DeactivationReason, ReturnValue};
use crate::inject::error::call_guarded;
use crate::inject::result::{self, MethodResult};

/// Which component-level callback a wrapper stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleMethodKind {
    Activate,
    Deactivate,
    Modified,
}

impl fmt::Display for LifecycleMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleMethodKind::Activate => write!(f, "activate"),
            LifecycleMethodKind::Deactivate => write!(f, "deactivate"),
            LifecycleMethodKind::Modified => write!(f, "modified"),
        }
    }
}

/// Invocable activate, deactivate or modified callback
pub trait LifecycleMethod: Send + Sync + fmt::Debug {
    /// Call the callback. `reason` only matters for deactivation.
    /// Never fails: errors end up in `failure`.
    fn invoke(
        &self,
        instance: &ComponentInstance,
        context: &ComponentContext,
        reason: DeactivationReason,
        failure: Option<MethodResult>,
    ) -> Option<MethodResult>;
}

/// Lifecycle wrapper forwarding to a [`ComponentManager`].
///
/// Without a declared callback name the wrapper is a no-op reporting a void result.
pub struct ComponentManagerLifecycleMethod {
    manager: Arc<dyn ComponentManager>,
    kind: LifecycleMethodKind,
    name: Option<String>,
}

impl ComponentManagerLifecycleMethod {
    pub fn new(manager: Arc<dyn ComponentManager>, kind: LifecycleMethodKind, name: Option<&str>) -> Self {
        Self {
            manager,
            kind,
            name: name.map(str::to_string),
        }
    }

    pub fn kind(&self) -> LifecycleMethodKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn call(&self, instance: &ComponentInstance, context: &ComponentContext, reason: DeactivationReason) -> CallbackResult {
        match self.kind {
            LifecycleMethodKind::Activate => self.manager.activate(instance, context),
            LifecycleMethodKind::Deactivate => self.manager.deactivate(instance, context, reason),
            LifecycleMethodKind::Modified => self.manager.modified(instance, context),
        }
    }
}

impl LifecycleMethod for ComponentManagerLifecycleMethod {
    fn invoke(
        &self,
        instance: &ComponentInstance,
        context: &ComponentContext,
        reason: DeactivationReason,
        failure: Option<MethodResult>,
    ) -> Option<MethodResult> {
        let Some(name) = self.name.as_deref() else {
            return Some(MethodResult::from_return_value(ReturnValue::Void));
        };
        let outcome = call_guarded(|| self.call(instance, context, reason));
        result::complete(outcome, failure, context.logger(), &self.kind, name)
    }
}

impl fmt::Debug for ComponentManagerLifecycleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentManagerLifecycleMethod")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
