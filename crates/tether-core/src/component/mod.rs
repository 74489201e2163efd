//! # Tether Core Components
//!
//! Describes the managed side of the engine: what a component declares
//! ([`ComponentMetadata`], [`ReferenceMetadata`]), how one activation is
//! identified ([`ComponentContext`]) and the contract of the external
//! [`ComponentManager`] that owns instance construction and performs the
//! actual callbacks.
//!
//! - **[`context`]**: Per-activation identity, properties and logger.
//! - **[`metadata`]**: Reference and component declarations, validation and parsing.
//! - **[`manager`]**: The [`ComponentManager`] contract, return values and deactivation reasons.
//! - **[`factory`]**: [`ComponentManagerFactory`], mapping component names to managers.
pub mod context;
pub mod factory;
pub mod manager;
pub mod metadata;

pub use context::{ComponentContext, ContextId};
pub use factory::ComponentManagerFactory;
pub use manager::{CallbackResult, ComponentInstance, ComponentManager, DeactivationReason, ReturnValue};
pub use metadata::{Cardinality, ComponentMetadata, ReferenceMetadata, ReferencePolicy, ReferenceScope};
