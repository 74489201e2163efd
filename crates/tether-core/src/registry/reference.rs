use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

/// Registry-assigned service identifier
pub type ServiceId = u64;

/// Property holding the service ranking
pub const SERVICE_RANKING: &str = "service.ranking";

/// Read-only view of a candidate's declared properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceProperties(Arc<BTreeMap<String, Value>>);

impl ServiceProperties {
    /// Wrap a property map
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self(Arc::new(values))
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check if key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over properties in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy the properties into an owned map
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        (*self.0).clone()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ServiceProperties {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

struct ReferenceInner {
    id: ServiceId,
    interface: String,
    properties: RwLock<ServiceProperties>,
}

/// Candidate descriptor used to request an instance from the registry.
///
/// Clones share the same live property set: a property update made through
/// the registry is visible from every clone. Equality and hashing use the id.
#[derive(Clone)]
pub struct ServiceReference {
    inner: Arc<ReferenceInner>,
}

impl ServiceReference {
    pub fn new(id: ServiceId, interface: impl Into<String>, properties: ServiceProperties) -> Self {
        Self {
            inner: Arc::new(ReferenceInner {
                id,
                interface: interface.into(),
                properties: RwLock::new(properties),
            }),
        }
    }

    pub fn id(&self) -> ServiceId {
        self.inner.id
    }

    /// Interface name this candidate was registered under
    pub fn interface(&self) -> &str {
        &self.inner.interface
    }

    /// Snapshot of the current properties
    pub fn properties(&self) -> ServiceProperties {
        self.inner.properties.read().clone()
    }

    /// Get a single property value
    pub fn property(&self, key: &str) -> Option<Value> {
        self.inner.properties.read().get(key).cloned()
    }

    /// Ranking declared through `service.ranking`, 0 when absent
    pub fn ranking(&self) -> i64 {
        self.property(SERVICE_RANKING)
            .and_then(|v| v.as_i64())
            .unwrap_or(0)
    }

    pub(crate) fn replace_properties(&self, properties: ServiceProperties) {
        *self.inner.properties.write() = properties;
    }
}

impl PartialEq for ServiceReference {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for ServiceReference {}

impl Hash for ServiceReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for ServiceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceReference")
            .field("id", &self.inner.id)
            .field("interface", &self.inner.interface)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ServiceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.inner.interface, self.inner.id)
    }
}
