use std::fmt;

use crate::component::context::ComponentContext;
use crate::kernel::error::{Error, Result};
use crate::refpair::RefPair;
use crate::registry::{ServiceObject, ServiceProperties, ServiceReference};

/// Declared shape of one bind callback parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterShape {
    /// The bound collaborator instance
    #[default]
    Service,
    /// The raw candidate descriptor
    ServiceReference,
    /// Read-only view of the candidate's properties
    Properties,
}

/// One resolved callback argument
#[derive(Clone)]
pub enum ParameterValue {
    Service(ServiceObject),
    ServiceReference(ServiceReference),
    Properties(ServiceProperties),
}

impl ParameterValue {
    pub fn shape(&self) -> ParameterShape {
        match self {
            ParameterValue::Service(_) => ParameterShape::Service,
            ParameterValue::ServiceReference(_) => ParameterShape::ServiceReference,
            ParameterValue::Properties(_) => ParameterShape::Properties,
        }
    }

    pub fn as_service(&self) -> Option<&ServiceObject> {
        match self {
            ParameterValue::Service(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ServiceReference> {
        match self {
            ParameterValue::ServiceReference(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_properties(&self) -> Option<&ServiceProperties> {
        match self {
            ParameterValue::Properties(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Debug for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Service(_) => f.write_str("Service(..)"),
            ParameterValue::ServiceReference(r) => f.debug_tuple("ServiceReference").field(r).finish(),
            ParameterValue::Properties(p) => f.debug_tuple("Properties").field(p).finish(),
        }
    }
}

/// Argument source handed to bind, unbind and updated callbacks
pub trait Parameters {
    /// Resolve `shapes` into arguments of the same length and order.
    ///
    /// Fails as a whole if any slot cannot be filled.
    fn get_parameters(&self, shapes: &[ParameterShape]) -> Result<Vec<ParameterValue>>;

    /// Activation the binding event belongs to
    fn context(&self) -> &ComponentContext;

    /// Candidate the binding event is about
    fn reference(&self) -> &ServiceReference;
}

/// A binding event: one activation and the pair being bound or unbound
#[derive(Clone, Copy)]
pub struct BindParameters<'a> {
    reference_name: &'a str,
    context: &'a ComponentContext,
    ref_pair: &'a dyn RefPair,
}

impl<'a> BindParameters<'a> {
    pub fn new(reference_name: &'a str, context: &'a ComponentContext, ref_pair: &'a dyn RefPair) -> Self {
        Self {
            reference_name,
            context,
            ref_pair,
        }
    }

    /// Name of the declared reference
    pub fn reference_name(&self) -> &str {
        self.reference_name
    }

    pub fn ref_pair(&self) -> &dyn RefPair {
        self.ref_pair
    }

    /// Instance bound for this event's context
    pub fn service_object(&self) -> Option<ServiceObject> {
        self.ref_pair.get(self.context)
    }

    /// Acquire an instance for this event's context
    pub fn acquire(&self) -> bool {
        self.ref_pair.acquire(self.context)
    }

    fn resolve(&self, index: usize, shape: ParameterShape) -> Result<ParameterValue> {
        match shape {
            ParameterShape::ServiceReference => Ok(ParameterValue::ServiceReference(self.ref_pair.reference().clone())),
            ParameterShape::Properties => Ok(ParameterValue::Properties(self.ref_pair.reference().properties())),
            ParameterShape::Service => self
                .service_object()
                .map(ParameterValue::Service)
                .ok_or_else(|| Error::ParameterResolution {
                    reference: self.reference_name.to_string(),
                    index,
                    message: format!(
                        "no instance of {} bound for {}",
                        self.ref_pair.reference(),
                        self.context.id()
                    ),
                }),
        }
    }
}

impl Parameters for BindParameters<'_> {
    fn get_parameters(&self, shapes: &[ParameterShape]) -> Result<Vec<ParameterValue>> {
        shapes
            .iter()
            .enumerate()
            .map(|(index, shape)| self.resolve(index, *shape))
            .collect()
    }

    fn context(&self) -> &ComponentContext {
        self.context
    }

    fn reference(&self) -> &ServiceReference {
        self.ref_pair.reference()
    }
}

impl fmt::Debug for BindParameters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindParameters")
            .field("reference_name", &self.reference_name)
            .field("context", &self.context.id())
            .field("ref_pair", &self.ref_pair)
            .finish()
    }
}
