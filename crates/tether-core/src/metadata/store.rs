use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::component::metadata::ComponentMetadata;
use crate::config::EngineConfig;

/// Identity of one revision of a descriptor provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BundleKey {
    pub bundle_id: u64,
    pub last_modified: u64,
}

impl BundleKey {
    pub fn new(bundle_id: u64, last_modified: u64) -> Self {
        Self {
            bundle_id,
            last_modified,
        }
    }
}

/// Cache of component declarations per provider revision
#[derive(Debug)]
pub struct ComponentMetadataStore {
    enabled: bool,
    cache: RwLock<HashMap<BundleKey, Arc<Vec<ComponentMetadata>>>>,
}

impl Default for ComponentMetadataStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ComponentMetadataStore {
    /// Create a store; a disabled store never retains anything
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.cache_metadata)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Declarations cached for `key`
    pub fn get_metadata(&self, key: &BundleKey) -> Option<Arc<Vec<ComponentMetadata>>> {
        self.cache.read().get(key).cloned()
    }

    /// Cache the declarations of one provider revision, replacing any previous entry
    pub fn add_metadata(&self, key: BundleKey, metadata: Vec<ComponentMetadata>) {
        if !self.enabled {
            return;
        }
        log::debug!(
            "Caching {} component declaration(s) for bundle {}",
            metadata.len(),
            key.bundle_id
        );
        self.cache.write().insert(key, Arc::new(metadata));
    }

    /// Drop every entry whose key is not in `current`. Returns the number removed.
    pub fn retain_current(&self, current: &HashSet<BundleKey>) -> usize {
        let mut cache = self.cache.write();
        let before = cache.len();
        cache.retain(|key, _| current.contains(key));
        before - cache.len()
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}
