//! # Tether Core Reference Binding State
//!
//! A [`RefPair`] holds the binding state of one declared reference for one
//! candidate collaborator: which instance(s) are bound, whether the last
//! acquisition failed, and how instances go back to the registry.
//!
//! - [`SingleRefPair`]: one shared instance. The `Unbound -> Bound` transition is
//!   a compare-and-set, so concurrent acquisitions have exactly one winner; the
//!   losers hand their surplus instance straight back.
//! - [`PrototypeRefPair`]: one instance per consuming [`ComponentContext`].
//!   A full release drains the whole map in one step before returning anything,
//!   so entries added during the sweep survive it.
//!
//! Neither variant lets a registry failure escape: acquisition failures set the
//! failed flag and log a warning, release failures are logged.
pub mod prototype;
pub mod single;

use std::fmt;

use log::Level;

use crate::component::context::ComponentContext;
use crate::kernel::logger::ComponentLogger;
use crate::registry::{ServiceObject, ServiceReference, ServiceRegistry};

pub use prototype::PrototypeRefPair;
pub use single::SingleRefPair;

/// Observable binding state of a pair for one context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefPairState {
    Unbound,
    Bound,
    /// Nothing bound and the last acquisition failed; cleared by the next successful one
    Failed,
}

/// Binding state of one reference to one candidate
pub trait RefPair: Send + Sync + fmt::Debug {
    /// Candidate descriptor instances are requested for
    fn reference(&self) -> &ServiceReference;

    /// Request an instance from the registry and bind it.
    ///
    /// Returns `false` only when the registry produced nothing; losing a
    /// binding race still returns `true`.
    fn acquire(&self, context: &ComponentContext) -> bool;

    /// Currently bound instance visible to `context`
    fn get(&self, context: &ComponentContext) -> Option<ServiceObject>;

    /// Release the instance bound for `context`, or everything for `None`.
    /// Releasing an unbound pair is a no-op.
    fn release(&self, context: Option<&ComponentContext>) -> Option<ServiceObject>;

    fn is_failed(&self) -> bool;

    /// Number of bound instances across all contexts
    fn bound_count(&self) -> usize;

    /// A bound instance wins over the failed flag
    fn state(&self, context: &ComponentContext) -> RefPairState {
        if self.get(context).is_some() {
            RefPairState::Bound
        } else if self.is_failed() {
            RefPairState::Failed
        } else {
            RefPairState::Unbound
        }
    }
}

/// Hand `service` back to the registry. "Already released" is a no-op.
pub(crate) fn return_service(
    registry: &dyn ServiceRegistry,
    reference: &ServiceReference,
    service: &ServiceObject,
    logger: Option<&dyn ComponentLogger>,
) {
    match registry.unget_service(reference, service) {
        Ok(()) => {}
        Err(e) if e.is_already_released() => {
            log::debug!("Ignoring redundant release of {}: {}", reference, e);
        }
        Err(e) => match logger {
            Some(logger) => logger.log(
                Level::Warn,
                format_args!("Could not release service from ref {}", reference),
                Some(&e),
            ),
            None => log::warn!("Could not release service from ref {}: {}", reference, e),
        },
    }
}

// Test module declaration
#[cfg(test)]
mod tests;
