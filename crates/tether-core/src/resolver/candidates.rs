use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::registry::reference::ServiceReference;

/// Ordered candidates of one requirement and the position of the current one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSelector {
    candidates: Arc<[ServiceReference]>,
    position: usize,
}

impl CandidateSelector {
    pub fn new(candidates: Vec<ServiceReference>) -> Self {
        Self {
            candidates: candidates.into(),
            position: 0,
        }
    }

    /// Independent selector at the same position
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn current(&self) -> Option<&ServiceReference> {
        self.candidates.get(self.position)
    }

    /// Skip the current candidate, returning it
    pub fn remove_current(&mut self) -> Option<ServiceReference> {
        let current = self.candidates.get(self.position).cloned();
        if current.is_some() {
            self.position += 1;
        }
        current
    }

    /// Candidates not yet skipped
    pub fn remaining(&self) -> &[ServiceReference] {
        self.candidates.get(self.position..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.candidates.len()
    }
}

/// Handle to a selector that may be shared by several requirements
pub type SharedSelector = Arc<Mutex<CandidateSelector>>;

/// Requirement name to candidate selector
#[derive(Debug, Default, Clone)]
pub struct CandidateMap {
    selectors: HashMap<String, SharedSelector>,
}

impl CandidateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `requirement` its own selector over `candidates`
    pub fn insert(&mut self, requirement: &str, candidates: Vec<ServiceReference>) -> SharedSelector {
        let selector = Arc::new(Mutex::new(CandidateSelector::new(candidates)));
        self.selectors.insert(requirement.to_string(), selector.clone());
        selector
    }

    /// Let `requirement` use an existing selector
    pub fn insert_shared(&mut self, requirement: &str, selector: SharedSelector) {
        self.selectors.insert(requirement.to_string(), selector);
    }

    pub fn get(&self, requirement: &str) -> Option<&SharedSelector> {
        self.selectors.get(requirement)
    }

    pub fn remove(&mut self, requirement: &str) -> Option<SharedSelector> {
        self.selectors.remove(requirement)
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Copy every selector.
    ///
    /// With `share_selectors`, requirements that shared a selector in `self`
    /// share one fresh copy in the result. Otherwise each requirement gets its
    /// own copy.
    pub fn deep_clone(&self, share_selectors: bool) -> Self {
        let mut copies: HashMap<*const Mutex<CandidateSelector>, SharedSelector> = HashMap::new();
        let fresh = |selector: &SharedSelector| Arc::new(Mutex::new(selector.lock().copy()));

        let selectors = self
            .selectors
            .iter()
            .map(|(requirement, selector)| {
                let copy = if share_selectors {
                    copies
                        .entry(Arc::as_ptr(selector))
                        .or_insert_with(|| fresh(selector))
                        .clone()
                } else {
                    fresh(selector)
                };
                (requirement.clone(), copy)
            })
            .collect();
        Self { selectors }
    }
}
