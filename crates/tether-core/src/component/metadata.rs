use std::collections::HashSet;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigFormat};
use crate::kernel::constants::{DEFAULT_DESCRIPTOR_VERSION, FIELD_INJECTION_MIN_VERSION};
use crate::kernel::error::{Error, Result};

/// How many collaborators a reference binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "0..1")]
    Optional,
    #[default]
    #[serde(rename = "1..1")]
    Mandatory,
    #[serde(rename = "0..n")]
    Multiple,
    #[serde(rename = "1..n")]
    AtLeastOne,
}

impl Cardinality {
    /// Whether more than one collaborator may be bound
    pub fn is_multiple(&self) -> bool {
        matches!(self, Cardinality::Multiple | Cardinality::AtLeastOne)
    }

    /// Whether zero bound collaborators is acceptable
    pub fn is_optional(&self) -> bool {
        matches!(self, Cardinality::Optional | Cardinality::Multiple)
    }
}

/// Whether bound collaborators may change while the component is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    #[default]
    Static,
    Dynamic,
}

/// Whether a collaborator instance is shared or obtained per activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceScope {
    /// One instance shared by the whole component
    #[default]
    Bundle,
    /// One instance per consuming activation
    Prototype,
}

/// Declared dependency of a component on a collaborator type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMetadata {
    pub name: String,
    pub interface: String,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default)]
    pub policy: ReferencePolicy,
    #[serde(default)]
    pub scope: ReferenceScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Field injected with the bound collaborator(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ReferenceMetadata {
    /// Create a mandatory, static, bundle-scoped reference without callbacks
    pub fn new(name: &str, interface: &str) -> Self {
        Self {
            name: name.to_string(),
            interface: interface.to_string(),
            cardinality: Cardinality::default(),
            policy: ReferencePolicy::default(),
            scope: ReferenceScope::default(),
            bind: None,
            unbind: None,
            updated: None,
            field: None,
        }
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn with_policy(mut self, policy: ReferencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_scope(mut self, scope: ReferenceScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set bind and unbind callback names together
    pub fn with_bind(mut self, bind: &str, unbind: &str) -> Self {
        self.bind = Some(bind.to_string());
        self.unbind = Some(unbind.to_string());
        self
    }

    pub fn with_updated(mut self, updated: &str) -> Self {
        self.updated = Some(updated.to_string());
        self
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    /// Whether the reference is injected into a field
    pub fn is_field_injected(&self) -> bool {
        self.field.is_some()
    }

    /// Whether bind/unbind callbacks are dispatched for this reference
    pub fn has_callbacks(&self) -> bool {
        self.bind.is_some() || self.field.is_some()
    }
}

fn default_descriptor_version() -> Version {
    Version::parse(DEFAULT_DESCRIPTOR_VERSION).unwrap_or_else(|_| Version::new(1, 0, 0))
}

/// Declaration of one component type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    pub name: String,
    /// Implementation type name handed to the constructor
    pub implementation: String,
    /// Descriptor namespace version
    #[serde(default = "default_descriptor_version")]
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    /// References in declaration order
    #[serde(default, rename = "reference")]
    pub references: Vec<ReferenceMetadata>,
}

impl ComponentMetadata {
    /// Create a component declaration with the default descriptor version
    pub fn new(name: &str, implementation: &str) -> Self {
        Self {
            name: name.to_string(),
            implementation: implementation.to_string(),
            version: default_descriptor_version(),
            activate: None,
            deactivate: None,
            modified: None,
            references: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Set activate and deactivate callback names
    pub fn with_lifecycle(mut self, activate: &str, deactivate: &str) -> Self {
        self.activate = Some(activate.to_string());
        self.deactivate = Some(deactivate.to_string());
        self
    }

    pub fn with_modified(mut self, modified: &str) -> Self {
        self.modified = Some(modified.to_string());
        self
    }

    pub fn with_reference(mut self, reference: ReferenceMetadata) -> Self {
        self.references.push(reference);
        self
    }

    /// Look up a reference by name
    pub fn reference(&self, name: &str) -> Option<&ReferenceMetadata> {
        self.references.iter().find(|r| r.name == name)
    }

    /// Check the declaration for structural problems
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_metadata("<unnamed>", "component name must not be empty"));
        }
        let min_field_version = Version::parse(FIELD_INJECTION_MIN_VERSION)
            .map_err(|e| Error::Other(format!("Invalid built-in version constant: {}", e)))?;

        let mut seen = HashSet::new();
        for reference in &self.references {
            if reference.name.is_empty() {
                return Err(Error::invalid_metadata(&self.name, "reference name must not be empty"));
            }
            if !seen.insert(reference.name.as_str()) {
                return Err(Error::invalid_metadata(
                    &self.name,
                    format!("duplicate reference name '{}'", reference.name),
                ));
            }
            if reference.field.is_some() && self.version < min_field_version {
                return Err(Error::invalid_metadata(
                    &self.name,
                    format!(
                        "reference '{}' uses field injection which requires descriptor version {} (declared {})",
                        reference.name, min_field_version, self.version
                    ),
                ));
            }
            if reference.scope == ReferenceScope::Prototype && self.version < min_field_version {
                return Err(Error::invalid_metadata(
                    &self.name,
                    format!(
                        "reference '{}' uses prototype scope which requires descriptor version {} (declared {})",
                        reference.name, min_field_version, self.version
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Parse and validate a descriptor
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self> {
        let metadata: ComponentMetadata = config::deserialize(data, format)?;
        metadata.validate()?;
        Ok(metadata)
    }
}
