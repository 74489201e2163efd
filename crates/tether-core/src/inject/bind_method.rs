use std::fmt;
use std::sync::Arc;

use log::Level;

use crate::component::manager::{CallbackResult, ComponentInstance, ComponentManager, ReturnValue};
use crate::inject::error::call_guarded;
use crate::inject::parameters::{BindParameters, Parameters};
use crate::inject::result::{self, MethodResult};
use crate::kernel::logger::ComponentLogger;

/// Which per-reference callback a wrapper stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindMethodKind {
    Bind,
    Unbind,
    Updated,
    /// Field preparation before the first bind
    Init,
}

impl fmt::Display for BindMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindMethodKind::Bind => write!(f, "bind"),
            BindMethodKind::Unbind => write!(f, "unbind"),
            BindMethodKind::Updated => write!(f, "updated"),
            BindMethodKind::Init => write!(f, "init"),
        }
    }
}

/// Result of [`ReferenceMethod::dispatch`]
#[derive(Debug, Clone)]
pub enum BindOutcome {
    /// No instance could be acquired; the callback was not called
    NotInvoked,
    /// The callback ran; carries its result or the failure template
    Invoked(Option<MethodResult>),
}

impl BindOutcome {
    pub fn is_invoked(&self) -> bool {
        matches!(self, BindOutcome::Invoked(_))
    }

    pub fn into_result(self) -> Option<MethodResult> {
        match self {
            BindOutcome::NotInvoked => None,
            BindOutcome::Invoked(result) => result,
        }
    }
}

/// Invocable per-reference callback
pub trait ReferenceMethod: Send + Sync + fmt::Debug {
    /// Make sure an instance is bound for the event's context
    fn get_service_object(&self, parameters: &BindParameters<'_>) -> bool;

    /// Call the callback. Never fails: errors end up in `failure`.
    fn invoke(
        &self,
        instance: &ComponentInstance,
        parameters: &BindParameters<'_>,
        failure: Option<MethodResult>,
    ) -> Option<MethodResult>;

    /// Acquire if needed, then invoke
    fn dispatch(
        &self,
        instance: &ComponentInstance,
        parameters: &BindParameters<'_>,
        failure: Option<MethodResult>,
    ) -> BindOutcome {
        if !self.get_service_object(parameters) {
            return BindOutcome::NotInvoked;
        }
        BindOutcome::Invoked(self.invoke(instance, parameters, failure))
    }
}

/// Field initialisation run once per instance before binding
pub trait InitReferenceMethod: Send + Sync + fmt::Debug {
    fn init(&self, instance: &ComponentInstance, logger: &dyn ComponentLogger) -> bool;
}

/// Per-reference wrapper forwarding to a [`ComponentManager`]
pub struct ComponentManagerBindMethod {
    manager: Arc<dyn ComponentManager>,
    name: String,
    kind: BindMethodKind,
}

impl ComponentManagerBindMethod {
    pub fn new(manager: Arc<dyn ComponentManager>, name: &str, kind: BindMethodKind) -> Self {
        Self {
            manager,
            name: name.to_string(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BindMethodKind {
        self.kind
    }

    fn call(&self, instance: &ComponentInstance, parameters: &dyn Parameters) -> CallbackResult {
        match self.kind {
            BindMethodKind::Bind => self.manager.bind(instance, &self.name, parameters),
            BindMethodKind::Unbind => self.manager.unbind(instance, &self.name, parameters),
            BindMethodKind::Updated => self.manager.updated(instance, &self.name, parameters),
            BindMethodKind::Init => {
                if self.manager.init(instance, &self.name) {
                    Ok(ReturnValue::Void)
                } else {
                    Err(format!("field '{}' could not be initialized", self.name).into())
                }
            }
        }
    }
}

impl ReferenceMethod for ComponentManagerBindMethod {
    fn get_service_object(&self, parameters: &BindParameters<'_>) -> bool {
        if parameters.service_object().is_none() {
            return parameters.acquire();
        }
        true
    }

    fn invoke(
        &self,
        instance: &ComponentInstance,
        parameters: &BindParameters<'_>,
        failure: Option<MethodResult>,
    ) -> Option<MethodResult> {
        let outcome = call_guarded(|| self.call(instance, parameters));
        result::complete(outcome, failure, parameters.context().logger(), &self.kind, &self.name)
    }
}

impl InitReferenceMethod for ComponentManagerBindMethod {
    fn init(&self, instance: &ComponentInstance, logger: &dyn ComponentLogger) -> bool {
        match call_guarded(|| Ok(self.manager.init(instance, &self.name))) {
            Ok(initialized) => initialized,
            Err(e) => {
                logger.log(
                    Level::Error,
                    format_args!("The init method for field '{}' has thrown an exception", self.name),
                    Some(e.as_ref()),
                );
                false
            }
        }
    }
}

impl fmt::Debug for ComponentManagerBindMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentManagerBindMethod")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Wrapper for references without callbacks: always satisfied, never calls anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NopReferenceMethod;

impl ReferenceMethod for NopReferenceMethod {
    fn get_service_object(&self, _parameters: &BindParameters<'_>) -> bool {
        true
    }

    fn invoke(
        &self,
        _instance: &ComponentInstance,
        _parameters: &BindParameters<'_>,
        _failure: Option<MethodResult>,
    ) -> Option<MethodResult> {
        Some(MethodResult::void())
    }
}
