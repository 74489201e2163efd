use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::kernel::logger::ComponentLogger;
use crate::registry::reference::ServiceProperties;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

struct ContextInner {
    id: ContextId,
    component_name: String,
    properties: ServiceProperties,
    logger: Arc<dyn ComponentLogger>,
}

/// Identity of one activation of one component instance.
///
/// Clones are handles to the same activation. Equality and hashing use the
/// [`ContextId`] only.
#[derive(Clone)]
pub struct ComponentContext {
    inner: Arc<ContextInner>,
}

impl ComponentContext {
    /// Create a context for a new activation without properties
    pub fn new(component_name: impl Into<String>, logger: Arc<dyn ComponentLogger>) -> Self {
        Self::with_properties(component_name, ServiceProperties::default(), logger)
    }

    /// Create a context for a new activation
    pub fn with_properties(
        component_name: impl Into<String>,
        properties: ServiceProperties,
        logger: Arc<dyn ComponentLogger>,
    ) -> Self {
        let id = ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            inner: Arc::new(ContextInner {
                id,
                component_name: component_name.into(),
                properties,
                logger,
            }),
        }
    }

    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    pub fn component_name(&self) -> &str {
        &self.inner.component_name
    }

    /// Component properties of this activation
    pub fn properties(&self) -> &ServiceProperties {
        &self.inner.properties
    }

    pub fn logger(&self) -> &dyn ComponentLogger {
        self.inner.logger.as_ref()
    }
}

impl PartialEq for ComponentContext {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for ComponentContext {}

impl Hash for ComponentContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for ComponentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContext")
            .field("id", &self.inner.id)
            .field("component_name", &self.inner.component_name)
            .finish_non_exhaustive()
    }
}
