//! Schema type definitions: entity types, complex types, entity sets.

use serde::{Deserialize, Serialize};

use crate::name::TypeName;
use crate::property::{NavigationProperty, StructuralProperty};

/// An entity type: keyed, addressable, may carry navigation properties.
///
/// Property slices preserve declaration order; converters walk them in
/// that order so written payloads are deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityType {
    pub(crate) name: TypeName,
    pub(crate) key: Vec<String>,
    pub(crate) properties: Vec<StructuralProperty>,
    pub(crate) navigation: Vec<NavigationProperty>,
}

impl EntityType {
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Key property names, in declaration order.
    pub fn key(&self) -> &[String] {
        &self.key
    }

    pub fn properties(&self) -> &[StructuralProperty] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&StructuralProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn navigation_properties(&self) -> &[NavigationProperty] {
        &self.navigation
    }

    pub fn navigation_property(&self, name: &str) -> Option<&NavigationProperty> {
        self.navigation.iter().find(|n| n.name == name)
    }
}

/// A complex type: structured, unkeyed, embedded in entries or other
/// complex values rather than addressed on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexType {
    pub(crate) name: TypeName,
    pub(crate) properties: Vec<StructuralProperty>,
}

impl ComplexType {
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn properties(&self) -> &[StructuralProperty] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&StructuralProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A named, addressable collection of one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySet {
    pub name: String,
    pub entity_type: TypeName,
}

impl EntitySet {
    pub fn new(name: impl Into<String>, entity_type: TypeName) -> Self {
        Self {
            name: name.into(),
            entity_type,
        }
    }
}
