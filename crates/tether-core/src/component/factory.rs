use std::sync::Arc;

use crate::component::manager::ComponentManager;

/// Source of component managers for the components of one provider.
///
/// A provider implementing this avoids any reflective handling of its
/// components: it constructs instances and performs injection itself.
pub trait ComponentManagerFactory: Send + Sync {
    /// Manager for `component_name`, or `None` if the provider does not know it
    fn create_component_manager(&self, component_name: &str) -> Option<Arc<dyn ComponentManager>>;
}

impl<F> ComponentManagerFactory for F
where
    F: Fn(&str) -> Option<Arc<dyn ComponentManager>> + Send + Sync,
{
    fn create_component_manager(&self, component_name: &str) -> Option<Arc<dyn ComponentManager>> {
        self(component_name)
    }
}
