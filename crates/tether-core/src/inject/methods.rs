use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use log::Level;

use crate::component::factory::ComponentManagerFactory;
use crate::component::manager::ComponentManager;
use crate::component::metadata::ComponentMetadata;
use crate::inject::bind_methods::{ComponentManagerBindMethods, NopReferenceMethods, ReferenceMethods};
use crate::inject::constructor::ComponentConstructor;
use crate::inject::lifecycle::{ComponentManagerLifecycleMethod, LifecycleMethod, LifecycleMethodKind};
use crate::kernel::logger::ComponentLogger;

/// Method table of one component type.
///
/// Getters return `None` until [`init_component_methods`](ComponentMethods::init_component_methods)
/// has run.
pub trait ComponentMethods: Send + Sync {
    /// Build the table from the component declaration. Only the first call
    /// has an effect; concurrent callers all observe the completed table.
    fn init_component_methods(&self, metadata: &ComponentMetadata, implementation: &str, logger: &dyn ComponentLogger);

    fn activate_method(&self) -> Option<Arc<dyn LifecycleMethod>>;

    fn deactivate_method(&self) -> Option<Arc<dyn LifecycleMethod>>;

    fn modified_method(&self) -> Option<Arc<dyn LifecycleMethod>>;

    /// Callbacks of the reference named `reference_name`
    fn bind_methods(&self, reference_name: &str) -> Option<Arc<dyn ReferenceMethods>>;

    fn constructor(&self) -> Option<Arc<ComponentConstructor>>;
}

struct MethodTable {
    component: String,
    activate: Arc<dyn LifecycleMethod>,
    deactivate: Arc<dyn LifecycleMethod>,
    modified: Arc<dyn LifecycleMethod>,
    bind_methods: HashMap<String, Arc<dyn ReferenceMethods>>,
    constructor: Arc<ComponentConstructor>,
}

impl MethodTable {
    fn build(manager: &Arc<dyn ComponentManager>, metadata: &ComponentMetadata, implementation: &str) -> Self {
        let lifecycle = |kind, name: &Option<String>| -> Arc<dyn LifecycleMethod> {
            Arc::new(ComponentManagerLifecycleMethod::new(manager.clone(), kind, name.as_deref()))
        };

        let nop: Arc<dyn ReferenceMethods> = Arc::new(NopReferenceMethods);
        let bind_methods = metadata
            .references
            .iter()
            .map(|reference| {
                let methods: Arc<dyn ReferenceMethods> = if reference.has_callbacks() {
                    Arc::new(ComponentManagerBindMethods::new(manager, reference))
                } else {
                    nop.clone()
                };
                (reference.name.clone(), methods)
            })
            .collect();

        Self {
            component: metadata.name.clone(),
            activate: lifecycle(LifecycleMethodKind::Activate, &metadata.activate),
            deactivate: lifecycle(LifecycleMethodKind::Deactivate, &metadata.deactivate),
            modified: lifecycle(LifecycleMethodKind::Modified, &metadata.modified),
            bind_methods,
            constructor: Arc::new(ComponentConstructor::new(&metadata.name, implementation, manager.clone())),
        }
    }
}

/// [`ComponentMethods`] backed by a [`ComponentManager`]
pub struct ComponentManagerMethods {
    manager: Arc<dyn ComponentManager>,
    table: OnceLock<MethodTable>,
}

impl ComponentManagerMethods {
    pub fn new(manager: Arc<dyn ComponentManager>) -> Self {
        Self {
            manager,
            table: OnceLock::new(),
        }
    }

    /// Look up the manager for `component_name` in `factory`
    pub fn from_factory(factory: &dyn ComponentManagerFactory, component_name: &str) -> Option<Self> {
        factory.create_component_manager(component_name).map(Self::new)
    }

    pub fn manager(&self) -> &Arc<dyn ComponentManager> {
        &self.manager
    }

    pub fn is_initialized(&self) -> bool {
        self.table.get().is_some()
    }

    /// Names of the references in the built table
    pub fn reference_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .table
            .get()
            .map(|t| t.bind_methods.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl ComponentMethods for ComponentManagerMethods {
    fn init_component_methods(&self, metadata: &ComponentMetadata, implementation: &str, logger: &dyn ComponentLogger) {
        let mut built = false;
        let table = self.table.get_or_init(|| {
            built = true;
            MethodTable::build(&self.manager, metadata, implementation)
        });
        if !built {
            logger.log(
                Level::Debug,
                format_args!("Component methods for {} already initialized", table.component),
                None,
            );
        }
    }

    fn activate_method(&self) -> Option<Arc<dyn LifecycleMethod>> {
        self.table.get().map(|t| t.activate.clone())
    }

    fn deactivate_method(&self) -> Option<Arc<dyn LifecycleMethod>> {
        self.table.get().map(|t| t.deactivate.clone())
    }

    fn modified_method(&self) -> Option<Arc<dyn LifecycleMethod>> {
        self.table.get().map(|t| t.modified.clone())
    }

    fn bind_methods(&self, reference_name: &str) -> Option<Arc<dyn ReferenceMethods>> {
        self.table.get()?.bind_methods.get(reference_name).cloned()
    }

    fn constructor(&self) -> Option<Arc<ComponentConstructor>> {
        self.table.get().map(|t| t.constructor.clone())
    }
}

impl fmt::Debug for ComponentManagerMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentManagerMethods")
            .field("initialized", &self.is_initialized())
            .field("references", &self.reference_names())
            .finish_non_exhaustive()
    }
}
