//! # Tether Core Injection and Dispatch
//!
//! Everything between a binding event and the component manager's callback:
//!
//! - **[`parameters`]**: Resolves declared [`ParameterShape`]s into ordered
//!   [`ParameterValue`]s for one binding event.
//! - **[`result`]**: [`MethodResult`], the typed outcome of a dispatched callback,
//!   including the failure template that captures errors under `"exception"`.
//! - **[`bind_method`]** / **[`bind_methods`]**: Per-reference wrappers
//!   (bind, unbind, updated, field init) and their per-reference grouping.
//! - **[`lifecycle`]**: Activate, deactivate and modified wrappers.
//! - **[`constructor`]**: [`ComponentConstructor`], instance construction through the manager.
//! - **[`methods`]**: The per-component-type method table, built exactly once.
//! - **[`error`]**: [`CallbackError`] and panic capture.
//!
//! No wrapper lets a callback failure escape: errors and panics are logged at
//! error level and folded into the caller's failure template.
pub mod bind_method;
pub mod bind_methods;
pub mod constructor;
pub mod error;
pub mod lifecycle;
pub mod methods;
pub mod parameters;
pub mod result;

pub use bind_method::{BindMethodKind, BindOutcome, ComponentManagerBindMethod, InitReferenceMethod, NopReferenceMethod, ReferenceMethod};
pub use bind_methods::{ComponentManagerBindMethods, NopReferenceMethods, ReferenceMethods};
pub use constructor::ComponentConstructor;
pub use error::{CallbackError, CallbackPanic};
pub use lifecycle::{ComponentManagerLifecycleMethod, LifecycleMethod, LifecycleMethodKind};
pub use methods::{ComponentManagerMethods, ComponentMethods};
pub use parameters::{BindParameters, ParameterShape, ParameterValue, Parameters};
pub use result::{MethodResult, ResultEntry};

// Test module declaration
#[cfg(test)]
mod tests;
