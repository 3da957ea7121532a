//! The published, immutable schema container.

use std::collections::HashMap;
use std::sync::Arc;

use crate::name::TypeName;
use crate::schema::{ComplexType, EntitySet, EntityType};
use crate::type_ref::TypeRef;

/// A validated schema: entity types, complex types, and entity sets with
/// by-name lookup.
///
/// Models are produced by [`ModelBuilder::build`](crate::ModelBuilder::build)
/// and never mutated afterwards; share them behind an `Arc` across
/// operations. Iteration orders are declaration orders.
#[derive(Debug)]
pub struct Model {
    pub(crate) namespace: String,
    pub(crate) entity_types: Vec<Arc<EntityType>>,
    pub(crate) complex_types: Vec<Arc<ComplexType>>,
    pub(crate) entity_sets: Vec<EntitySet>,
    pub(crate) entity_index: HashMap<String, usize>,
    pub(crate) complex_index: HashMap<String, usize>,
    pub(crate) set_index: HashMap<String, usize>,
}

impl Model {
    /// Default namespace the model was declared in.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn entity_types(&self) -> &[Arc<EntityType>] {
        &self.entity_types
    }

    pub fn complex_types(&self) -> &[Arc<ComplexType>] {
        &self.complex_types
    }

    pub fn entity_sets(&self) -> &[EntitySet] {
        &self.entity_sets
    }

    pub fn entity_type(&self, name: &TypeName) -> Option<&Arc<EntityType>> {
        self.entity_type_named(&name.qualified())
    }

    pub fn entity_type_named(&self, qualified: &str) -> Option<&Arc<EntityType>> {
        self.entity_index
            .get(qualified)
            .map(|&i| &self.entity_types[i])
    }

    pub fn complex_type(&self, name: &TypeName) -> Option<&Arc<ComplexType>> {
        self.complex_type_named(&name.qualified())
    }

    pub fn complex_type_named(&self, qualified: &str) -> Option<&Arc<ComplexType>> {
        self.complex_index
            .get(qualified)
            .map(|&i| &self.complex_types[i])
    }

    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.set_index.get(name).map(|&i| &self.entity_sets[i])
    }

    /// Resolve a qualified name to an entity or complex reference.
    pub fn type_ref(&self, qualified: &str) -> Option<TypeRef> {
        if self.entity_index.contains_key(qualified) {
            Some(TypeRef::Entity(TypeName::parse(qualified)))
        } else if self.complex_index.contains_key(qualified) {
            Some(TypeRef::Complex(TypeName::parse(qualified)))
        } else {
            None
        }
    }

    /// Whether a reference resolves against this model. Primitives always
    /// do; entity/complex names must be declared; collections resolve when
    /// their element does.
    pub fn resolves(&self, type_ref: &TypeRef) -> bool {
        match type_ref {
            TypeRef::Primitive(_) => true,
            TypeRef::Entity(name) => self.entity_type(name).is_some(),
            TypeRef::Complex(name) => self.complex_type(name).is_some(),
            TypeRef::Collection(element) => self.resolves(element),
        }
    }
}
