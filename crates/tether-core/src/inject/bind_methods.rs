use std::fmt;
use std::sync::Arc;

use crate::component::manager::ComponentManager;
use crate::component::metadata::ReferenceMetadata;
use crate::inject::bind_method::{
    BindMethodKind, ComponentManagerBindMethod, InitReferenceMethod, NopReferenceMethod, ReferenceMethod,
};

static NOP_REFERENCE_METHOD: NopReferenceMethod = NopReferenceMethod;

/// The callbacks of one declared reference
pub trait ReferenceMethods: Send + Sync + fmt::Debug {
    fn bind(&self) -> &dyn ReferenceMethod;
    fn unbind(&self) -> &dyn ReferenceMethod;
    fn updated(&self) -> &dyn ReferenceMethod;
    /// Field initialiser, present only for field-injected references
    fn init(&self) -> Option<&dyn InitReferenceMethod>;
}

/// Methods of a reference that declares neither callbacks nor a field
#[derive(Debug, Clone, Copy, Default)]
pub struct NopReferenceMethods;

impl ReferenceMethods for NopReferenceMethods {
    fn bind(&self) -> &dyn ReferenceMethod {
        &NOP_REFERENCE_METHOD
    }

    fn unbind(&self) -> &dyn ReferenceMethod {
        &NOP_REFERENCE_METHOD
    }

    fn updated(&self) -> &dyn ReferenceMethod {
        &NOP_REFERENCE_METHOD
    }

    fn init(&self) -> Option<&dyn InitReferenceMethod> {
        None
    }
}

/// Callbacks of one reference, all forwarding to the component manager.
///
/// A callback without a declared name falls back to the injected field's
/// name; with neither, that slot is a no-op.
pub struct ComponentManagerBindMethods {
    bind: Option<ComponentManagerBindMethod>,
    unbind: Option<ComponentManagerBindMethod>,
    updated: Option<ComponentManagerBindMethod>,
    init: Option<ComponentManagerBindMethod>,
}

impl ComponentManagerBindMethods {
    pub fn new(manager: &Arc<dyn ComponentManager>, reference: &ReferenceMetadata) -> Self {
        let field = reference.field.as_deref();
        Self {
            bind: Self::wrap(manager, reference.bind.as_deref(), field, BindMethodKind::Bind),
            unbind: Self::wrap(manager, reference.unbind.as_deref(), field, BindMethodKind::Unbind),
            updated: Self::wrap(manager, reference.updated.as_deref(), field, BindMethodKind::Updated),
            init: field.map(|f| ComponentManagerBindMethod::new(manager.clone(), f, BindMethodKind::Init)),
        }
    }

    fn wrap<'a>(
        manager: &Arc<dyn ComponentManager>,
        name: Option<&'a str>,
        field: Option<&'a str>,
        kind: BindMethodKind,
    ) -> Option<ComponentManagerBindMethod> {
        name.or(field)
            .map(|name| ComponentManagerBindMethod::new(manager.clone(), name, kind))
    }

    fn or_nop(method: &Option<ComponentManagerBindMethod>) -> &dyn ReferenceMethod {
        match method {
            Some(m) => m,
            None => &NOP_REFERENCE_METHOD,
        }
    }
}

impl ReferenceMethods for ComponentManagerBindMethods {
    fn bind(&self) -> &dyn ReferenceMethod {
        Self::or_nop(&self.bind)
    }

    fn unbind(&self) -> &dyn ReferenceMethod {
        Self::or_nop(&self.unbind)
    }

    fn updated(&self) -> &dyn ReferenceMethod {
        Self::or_nop(&self.updated)
    }

    fn init(&self) -> Option<&dyn InitReferenceMethod> {
        self.init.as_ref().map(|m| m as &dyn InitReferenceMethod)
    }
}

impl fmt::Debug for ComponentManagerBindMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |m: &Option<ComponentManagerBindMethod>| m.as_ref().map(|m| m.name().to_string());
        f.debug_struct("ComponentManagerBindMethods")
            .field("bind", &name(&self.bind))
            .field("unbind", &name(&self.unbind))
            .field("updated", &name(&self.updated))
            .field("init", &name(&self.init))
            .finish()
    }
}
