use std::fmt;
use std::sync::Arc;

use log::Level;

use crate::component::context::ComponentContext;
use crate::component::manager::{ComponentInstance, ComponentManager};
use crate::inject::error::call_guarded;
use crate::kernel::error::{Error, Result};

/// Creates component instances through the component manager
pub struct ComponentConstructor {
    component: String,
    implementation: String,
    manager: Arc<dyn ComponentManager>,
}

impl ComponentConstructor {
    pub fn new(component: &str, implementation: &str, manager: Arc<dyn ComponentManager>) -> Self {
        Self {
            component: component.to_string(),
            implementation: implementation.to_string(),
            manager,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Construct a new instance for the activation identified by `context`.
    ///
    /// A failing or panicking manager is logged and reported as
    /// [`Error::Construction`].
    pub fn new_instance(&self, context: &ComponentContext) -> Result<ComponentInstance> {
        call_guarded(|| self.manager.construct(context)).map_err(|source| {
            context.logger().log(
                Level::Error,
                format_args!("Could not create an instance of {}", self.implementation),
                Some(source.as_ref()),
            );
            Error::Construction {
                component: self.component.clone(),
                source,
            }
        })
    }
}

impl fmt::Debug for ComponentConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentConstructor")
            .field("component", &self.component)
            .field("implementation", &self.implementation)
            .finish_non_exhaustive()
    }
}
