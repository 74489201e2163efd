use std::fmt;
use std::sync::Arc;

use log::Level;
use parking_lot::{Mutex, RwLock};

use crate::activation::report::{ActivationReport, ReferenceReport};
use crate::component::context::ComponentContext;
use crate::component::manager::{ComponentInstance, DeactivationReason};
use crate::component::metadata::{ComponentMetadata, ReferenceMetadata, ReferenceScope};
use crate::inject::bind_method::BindOutcome;
use crate::inject::bind_methods::ReferenceMethods;
use crate::inject::lifecycle::LifecycleMethod;
use crate::inject::methods::ComponentMethods;
use crate::inject::parameters::BindParameters;
use crate::inject::result::MethodResult;
use crate::kernel::error::{Error, Result};
use crate::refpair::{PrototypeRefPair, RefPair, SingleRefPair};
use crate::registry::{ServiceReference, ServiceRegistry};
use crate::resolver::CandidateMap;

struct BoundReference {
    metadata: ReferenceMetadata,
    methods: Arc<dyn ReferenceMethods>,
    pairs: Vec<Arc<dyn RefPair>>,
}

impl BoundReference {
    fn position(&self, candidate: &ServiceReference) -> Option<usize> {
        self.pairs.iter().position(|pair| pair.reference() == candidate)
    }
}

struct ActiveState {
    methods: Arc<dyn ComponentMethods>,
    instance: ComponentInstance,
    references: Vec<BoundReference>,
}

impl ActiveState {
    fn reference_mut(&mut self, component: &str, name: &str) -> Result<&mut BoundReference> {
        self.references
            .iter_mut()
            .find(|r| r.metadata.name == name)
            .ok_or_else(|| Error::UnknownReference {
                component: component.to_string(),
                reference: name.to_string(),
            })
    }
}

/// Everything needed to run one callback outside the state lock
struct PairCall {
    instance: ComponentInstance,
    methods: Arc<dyn ReferenceMethods>,
    pair: Arc<dyn RefPair>,
}

/// One activation of one component.
///
/// Drives construction, binding and the lifecycle callbacks through a
/// [`ComponentMethods`] table. Registry notifications for the activation's
/// references arrive through [`candidate_added`](Self::candidate_added),
/// [`candidate_modified`](Self::candidate_modified) and
/// [`candidate_removed`](Self::candidate_removed). Whether a candidate should
/// be bound at all is the caller's decision.
///
/// Activation and deactivation are exclusive with each other and with every
/// in-flight notification; notifications and `modified` may run concurrently.
/// Callbacks must not call back into the same activation.
pub struct ComponentActivation {
    metadata: ComponentMetadata,
    registry: Arc<dyn ServiceRegistry>,
    context: ComponentContext,
    /// Held for write across activate and deactivate, for read across notification dispatch
    transitions: RwLock<()>,
    state: Mutex<Option<ActiveState>>,
}

impl ComponentActivation {
    pub fn new(metadata: ComponentMetadata, registry: Arc<dyn ServiceRegistry>, context: ComponentContext) -> Self {
        Self {
            metadata,
            registry,
            context,
            transitions: RwLock::new(()),
            state: Mutex::new(None),
        }
    }

    pub fn context(&self) -> &ComponentContext {
        &self.context
    }

    pub fn metadata(&self) -> &ComponentMetadata {
        &self.metadata
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().is_some()
    }

    /// The live component instance
    pub fn instance(&self) -> Option<ComponentInstance> {
        self.state.lock().as_ref().map(|s| s.instance.clone())
    }

    /// Pairs currently tracked for reference `name`, in binding order
    pub fn pairs(&self, name: &str) -> Vec<Arc<dyn RefPair>> {
        self.state
            .lock()
            .as_ref()
            .and_then(|s| s.references.iter().find(|r| r.metadata.name == name))
            .map(|r| r.pairs.clone())
            .unwrap_or_default()
    }

    /// Construct the instance, bind the candidates and call activate.
    ///
    /// A single-cardinality reference binds the current candidate of its
    /// selector; a multiple one binds all remaining candidates. Callback
    /// failures are reported in the returned [`ActivationReport`], not as errors.
    pub fn activate(&self, methods: Arc<dyn ComponentMethods>, candidates: &CandidateMap) -> Result<ActivationReport> {
        let _transition = self.transitions.write();
        if self.is_active() {
            return Err(self.activation_error("component is already active"));
        }
        let component = self.metadata.name.as_str();
        let logger = self.context.logger();
        methods.init_component_methods(&self.metadata, &self.metadata.implementation, logger);

        let constructor = methods.constructor().ok_or_else(|| Error::MethodsNotInitialized {
            component: component.to_string(),
        })?;
        let activate = methods.activate_method().ok_or_else(|| Error::MethodsNotInitialized {
            component: component.to_string(),
        })?;
        let instance = constructor.new_instance(&self.context)?;

        let mut references = Vec::with_capacity(self.metadata.references.len());
        for reference in &self.metadata.references {
            let reference_methods = methods.bind_methods(&reference.name).ok_or_else(|| Error::UnknownReference {
                component: component.to_string(),
                reference: reference.name.clone(),
            })?;
            if let Some(init) = reference_methods.init() {
                if !init.init(&instance, logger) {
                    return Err(self.activation_error(format!(
                        "field for reference '{}' could not be initialized",
                        reference.name
                    )));
                }
            }
            references.push(BoundReference {
                metadata: reference.clone(),
                methods: reference_methods,
                pairs: Vec::new(),
            });
        }

        let mut report = ActivationReport::new(component);
        for bound in &mut references {
            let mut reference_report = ReferenceReport::new(&bound.metadata.name);
            for candidate in Self::selected(&bound.metadata, candidates) {
                let pair = self.new_pair(&bound.metadata, candidate);
                let params = BindParameters::new(&bound.metadata.name, &self.context, pair.as_ref());
                let outcome = bound
                    .methods
                    .bind()
                    .dispatch(&instance, &params, Some(MethodResult::failure_template()));
                reference_report.record(&outcome, pair.bound_count() > 0);
                bound.pairs.push(pair);
            }
            report.push(reference_report);
        }

        report.set_lifecycle(activate.invoke(
            &instance,
            &self.context,
            DeactivationReason::Unspecified,
            Some(MethodResult::failure_template()),
        ));

        logger.log(
            Level::Debug,
            format_args!("Activated with {} bound instance(s)", report.bound()),
            None,
        );
        *self.state.lock() = Some(ActiveState {
            methods,
            instance,
            references,
        });
        Ok(report)
    }

    /// A new candidate for reference `name` appeared. Binds it, or retries a
    /// candidate whose earlier acquisition failed.
    pub fn candidate_added(&self, name: &str, candidate: &ServiceReference) -> Result<BindOutcome> {
        let _transition = self.transitions.read();
        let call = {
            let mut guard = self.state.lock();
            let state = guard.as_mut().ok_or_else(|| self.activation_error("component is not active"))?;
            let instance = state.instance.clone();
            let bound = state.reference_mut(&self.metadata.name, name)?;
            let pair = match bound.position(candidate) {
                Some(index) => {
                    let existing = bound.pairs[index].clone();
                    if existing.get(&self.context).is_some() {
                        return Err(self.activation_error(format!(
                            "candidate {} is already bound to reference '{}'",
                            candidate, name
                        )));
                    }
                    existing
                }
                None => {
                    let pair = self.new_pair(&bound.metadata, candidate.clone());
                    bound.pairs.push(pair.clone());
                    pair
                }
            };
            PairCall {
                instance,
                methods: bound.methods.clone(),
                pair,
            }
        };
        let params = BindParameters::new(name, &self.context, call.pair.as_ref());
        Ok(call
            .methods
            .bind()
            .dispatch(&call.instance, &params, Some(MethodResult::failure_template())))
    }

    /// The properties of a tracked candidate changed
    pub fn candidate_modified(&self, name: &str, candidate: &ServiceReference) -> Result<BindOutcome> {
        let _transition = self.transitions.read();
        let call = self.tracked(name, candidate, false)?;
        let params = BindParameters::new(name, &self.context, call.pair.as_ref());
        Ok(call
            .methods
            .updated()
            .dispatch(&call.instance, &params, Some(MethodResult::failure_template())))
    }

    /// A tracked candidate went away: unbind it if bound, then release it.
    ///
    /// Returns the unbind result, or `None` if the candidate was never bound.
    pub fn candidate_removed(&self, name: &str, candidate: &ServiceReference) -> Result<Option<MethodResult>> {
        let _transition = self.transitions.read();
        let call = self.tracked(name, candidate, true)?;
        let result = self.unbind(&call.instance, name, call.methods.as_ref(), call.pair.as_ref());
        call.pair.release(None);
        Ok(result)
    }

    /// Call the modified callback
    pub fn modified(&self) -> Result<Option<MethodResult>> {
        let _transition = self.transitions.read();
        let (methods, instance) = {
            let guard = self.state.lock();
            let state = guard.as_ref().ok_or_else(|| self.activation_error("component is not active"))?;
            (state.methods.clone(), state.instance.clone())
        };
        let modified = self.lifecycle(methods.modified_method())?;
        Ok(modified.invoke(
            &instance,
            &self.context,
            DeactivationReason::Unspecified,
            Some(MethodResult::failure_template()),
        ))
    }

    /// Tear the activation down: deactivate callback, unbind in reverse
    /// declaration order, then release every pair.
    pub fn deactivate(&self, reason: DeactivationReason) -> Result<Option<MethodResult>> {
        let _transition = self.transitions.write();
        let state = self
            .state
            .lock()
            .take()
            .ok_or_else(|| self.activation_error("component is not active"))?;

        let deactivate = self.lifecycle(state.methods.deactivate_method())?;
        let result = deactivate.invoke(
            &state.instance,
            &self.context,
            reason,
            Some(MethodResult::failure_template()),
        );

        for bound in state.references.iter().rev() {
            for pair in bound.pairs.iter().rev() {
                self.unbind(&state.instance, &bound.metadata.name, bound.methods.as_ref(), pair.as_ref());
            }
        }
        for bound in &state.references {
            for pair in &bound.pairs {
                pair.release(None);
            }
        }

        self.context.logger().log(
            Level::Debug,
            format_args!("Deactivated ({})", reason),
            None,
        );
        Ok(result)
    }

    fn selected(reference: &ReferenceMetadata, candidates: &CandidateMap) -> Vec<ServiceReference> {
        let Some(selector) = candidates.get(&reference.name) else {
            return Vec::new();
        };
        let selector = selector.lock();
        if reference.cardinality.is_multiple() {
            selector.remaining().to_vec()
        } else {
            selector.current().cloned().into_iter().collect()
        }
    }

    fn new_pair(&self, reference: &ReferenceMetadata, candidate: ServiceReference) -> Arc<dyn RefPair> {
        match reference.scope {
            ReferenceScope::Prototype => Arc::new(PrototypeRefPair::new(candidate, self.registry.clone())),
            ReferenceScope::Bundle => Arc::new(SingleRefPair::new(candidate, self.registry.clone())),
        }
    }

    fn tracked(&self, name: &str, candidate: &ServiceReference, remove: bool) -> Result<PairCall> {
        let mut guard = self.state.lock();
        let state = guard.as_mut().ok_or_else(|| self.activation_error("component is not active"))?;
        let instance = state.instance.clone();
        let bound = state.reference_mut(&self.metadata.name, name)?;
        let index = bound.position(candidate).ok_or_else(|| {
            self.activation_error(format!("candidate {} is not tracked by reference '{}'", candidate, name))
        })?;
        let pair = if remove {
            bound.pairs.remove(index)
        } else {
            bound.pairs[index].clone()
        };
        Ok(PairCall {
            instance,
            methods: bound.methods.clone(),
            pair,
        })
    }

    fn unbind(
        &self,
        instance: &ComponentInstance,
        name: &str,
        methods: &dyn ReferenceMethods,
        pair: &dyn RefPair,
    ) -> Option<MethodResult> {
        if pair.get(&self.context).is_none() {
            return None;
        }
        let params = BindParameters::new(name, &self.context, pair);
        methods
            .unbind()
            .invoke(instance, &params, Some(MethodResult::failure_template()))
    }

    fn lifecycle(&self, method: Option<Arc<dyn LifecycleMethod>>) -> Result<Arc<dyn LifecycleMethod>> {
        method.ok_or_else(|| Error::MethodsNotInitialized {
            component: self.metadata.name.clone(),
        })
    }

    fn activation_error(&self, message: impl Into<String>) -> Error {
        Error::Activation {
            component: self.metadata.name.clone(),
            message: message.into(),
        }
    }
}

impl fmt::Debug for ComponentActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentActivation")
            .field("component", &self.metadata.name)
            .field("context", &self.context.id())
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
