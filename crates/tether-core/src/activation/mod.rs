//! # Tether Core Activation
//!
//! Host-side driver tying the method table, the binding state and the
//! registry together for one activation of one component.
//!
//! ## Lifecycle:
//!
//! 1. **Activate**: build the method table (once per component type),
//!    construct the instance, initialise injected fields, bind candidates
//!    in declaration order, call activate.
//! 2. **Notifications**: candidates added, modified or removed while active.
//! 3. **Modified**: configuration change without reactivation.
//! 4. **Deactivate**: call deactivate, unbind in reverse declaration order,
//!    release every pair.
pub mod driver;
pub mod report;

pub use driver::ComponentActivation;
pub use report::{ActivationReport, ReferenceReport};
