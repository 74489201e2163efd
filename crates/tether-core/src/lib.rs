//! # Tether Core
//!
//! Reference binding and lifecycle dispatch for managed components.
//!
//! A component declares references to collaborator types. For every
//! activation the engine binds candidate collaborators obtained from an
//! external registry ([`refpair`]), marshals them into the component
//! manager's callbacks ([`inject`]) and drives activation, reconfiguration
//! and deactivation ([`activation`]). Callback failures never unwind past the
//! engine: they are logged and reported as [`MethodResult`] values.
pub mod activation;
pub mod component;
pub mod config;
pub mod inject;
pub mod kernel;
pub mod metadata;
pub mod refpair;
pub mod registry;
pub mod resolver;

// Re-export key public types/traits
pub use activation::{ActivationReport, ComponentActivation};
pub use component::{ComponentContext, ComponentManager, ComponentManagerFactory, ComponentMetadata, ReferenceMetadata};
pub use config::EngineConfig;
pub use inject::{ComponentManagerMethods, ComponentMethods, MethodResult, ParameterShape, ParameterValue, Parameters};
pub use kernel::error::Error as TetherError;
pub use kernel::{ComponentLogger, FacadeLogger};
pub use refpair::{PrototypeRefPair, RefPair, SingleRefPair};
pub use registry::{InMemoryServiceRegistry, ServiceReference, ServiceRegistry};

#[cfg(test)]
mod tests;
