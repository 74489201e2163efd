use crate::inject::bind_method::BindOutcome;
use crate::inject::result::MethodResult;

/// Binding summary of one reference during activation
#[derive(Debug, Clone, Default)]
pub struct ReferenceReport {
    pub name: String,
    /// Candidates whose bind was dispatched
    pub dispatched: usize,
    /// Dispatched candidates that hold an instance afterwards
    pub bound: usize,
    /// Candidates the registry produced no instance for
    pub unavailable: usize,
    /// Bind callbacks that failed or panicked
    pub callback_failures: usize,
}

impl ReferenceReport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Count one dispatch; `holds_instance` is whether the pair is bound afterwards.
    /// References without callbacks never acquire, so they only count as dispatched.
    pub(crate) fn record(&mut self, outcome: &BindOutcome, holds_instance: bool) {
        match outcome {
            BindOutcome::NotInvoked => self.unavailable += 1,
            BindOutcome::Invoked(result) => {
                self.dispatched += 1;
                if holds_instance {
                    self.bound += 1;
                }
                if result.as_ref().and_then(MethodResult::exception).is_some() {
                    self.callback_failures += 1;
                }
            }
        }
    }

    pub fn candidates(&self) -> usize {
        self.dispatched + self.unavailable
    }
}

/// Outcome of [`ComponentActivation::activate`](crate::activation::ComponentActivation::activate)
#[derive(Debug, Clone)]
pub struct ActivationReport {
    component: String,
    references: Vec<ReferenceReport>,
    lifecycle: Option<MethodResult>,
}

impl ActivationReport {
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            references: Vec::new(),
            lifecycle: None,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub(crate) fn push(&mut self, reference: ReferenceReport) {
        self.references.push(reference);
    }

    pub(crate) fn set_lifecycle(&mut self, result: Option<MethodResult>) {
        self.lifecycle = result;
    }

    /// Per-reference summaries in declaration order
    pub fn references(&self) -> &[ReferenceReport] {
        &self.references
    }

    pub fn reference(&self, name: &str) -> Option<&ReferenceReport> {
        self.references.iter().find(|r| r.name == name)
    }

    /// Result of the activate callback
    pub fn lifecycle(&self) -> Option<&MethodResult> {
        self.lifecycle.as_ref()
    }

    /// Total candidates bound across all references
    pub fn bound(&self) -> usize {
        self.references.iter().map(|r| r.bound).sum()
    }

    /// Whether the activate callback or any bind callback failed
    pub fn has_failures(&self) -> bool {
        self.lifecycle.as_ref().and_then(MethodResult::exception).is_some()
            || self.references.iter().any(|r| r.callback_failures > 0)
    }
}
