use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::component::context::ComponentContext;
use crate::inject::error::CallbackError;
use crate::inject::parameters::Parameters;

/// A constructed component instance
pub type ComponentInstance = Arc<dyn Any + Send + Sync>;

/// What a callback handed back
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue {
    /// The callback has no return value
    Void,
    /// The callback returned, optionally with a property map
    Value(Option<BTreeMap<String, Value>>),
}

impl ReturnValue {
    pub fn is_void(&self) -> bool {
        matches!(self, ReturnValue::Void)
    }
}

/// Outcome of a component manager callback
pub type CallbackResult = Result<ReturnValue, CallbackError>;

/// Why a component is being deactivated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeactivationReason {
    #[default]
    Unspecified,
    Disabled,
    Reference,
    ConfigurationModified,
    ConfigurationDeleted,
    Disposed,
    BundleStopped,
}

impl DeactivationReason {
    /// Stable numeric code passed to deactivate callbacks
    pub fn code(&self) -> i32 {
        match self {
            DeactivationReason::Unspecified => 0,
            DeactivationReason::Disabled => 1,
            DeactivationReason::Reference => 2,
            DeactivationReason::ConfigurationModified => 3,
            DeactivationReason::ConfigurationDeleted => 4,
            DeactivationReason::Disposed => 5,
            DeactivationReason::BundleStopped => 6,
        }
    }

    /// Map a numeric code back; unknown codes become `Unspecified`
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => DeactivationReason::Disabled,
            2 => DeactivationReason::Reference,
            3 => DeactivationReason::ConfigurationModified,
            4 => DeactivationReason::ConfigurationDeleted,
            5 => DeactivationReason::Disposed,
            6 => DeactivationReason::BundleStopped,
            _ => DeactivationReason::Unspecified,
        }
    }
}

impl fmt::Display for DeactivationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeactivationReason::Unspecified => "unspecified",
            DeactivationReason::Disabled => "disabled",
            DeactivationReason::Reference => "reference",
            DeactivationReason::ConfigurationModified => "configuration modified",
            DeactivationReason::ConfigurationDeleted => "configuration deleted",
            DeactivationReason::Disposed => "disposed",
            DeactivationReason::BundleStopped => "bundle stopped",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// Owner of a component type's instances and callbacks.
///
/// Implemented outside the engine, typically generated per component type so
/// that no reflective lookup is needed. Every callback may fail or panic; the
/// engine's method wrappers contain both.
pub trait ComponentManager: Send + Sync {
    /// Construct a new component instance for an activation
    fn construct(&self, context: &ComponentContext) -> Result<ComponentInstance, CallbackError>;

    /// Prepare the injected field `field` before any bind happens
    fn init(&self, instance: &ComponentInstance, field: &str) -> bool {
        let _ = (instance, field);
        true
    }

    fn bind(&self, instance: &ComponentInstance, name: &str, parameters: &dyn Parameters) -> CallbackResult;

    fn unbind(&self, instance: &ComponentInstance, name: &str, parameters: &dyn Parameters) -> CallbackResult;

    fn updated(&self, instance: &ComponentInstance, name: &str, parameters: &dyn Parameters) -> CallbackResult;

    fn activate(&self, instance: &ComponentInstance, context: &ComponentContext) -> CallbackResult;

    fn deactivate(
        &self,
        instance: &ComponentInstance,
        context: &ComponentContext,
        reason: DeactivationReason,
    ) -> CallbackResult;

    fn modified(&self, instance: &ComponentInstance, context: &ComponentContext) -> CallbackResult;
}
