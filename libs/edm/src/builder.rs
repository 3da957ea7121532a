//! Mutable schema assembly, validated into an immutable [`Model`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::name::TypeName;
use crate::property::{NavigationProperty, StructuralProperty};
use crate::schema::{ComplexType, EntitySet, EntityType};
use crate::type_ref::TypeRef;

/// Builds a [`Model`] declaration by declaration.
///
/// Local names are qualified with the builder's default namespace;
/// cross-references between declarations are checked once at
/// [`build`](Self::build), so declaration order does not matter.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    namespace: String,
    entities: Vec<EntityType>,
    complexes: Vec<ComplexType>,
    sets: Vec<EntitySet>,
}

impl ModelBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Start a new entity type declaration with the given local name.
    pub fn entity_type(&mut self, name: &str) -> EntityTypeBuilder<'_> {
        self.entities.push(EntityType {
            name: TypeName::new(self.namespace.clone(), name),
            key: Vec::new(),
            properties: Vec::new(),
            navigation: Vec::new(),
        });
        EntityTypeBuilder {
            entity: self.entities.last_mut().unwrap(),
            namespace: self.namespace.clone(),
        }
    }

    /// Start a new complex type declaration with the given local name.
    pub fn complex_type(&mut self, name: &str) -> ComplexTypeBuilder<'_> {
        self.complexes.push(ComplexType {
            name: TypeName::new(self.namespace.clone(), name),
            properties: Vec::new(),
        });
        ComplexTypeBuilder {
            complex: self.complexes.last_mut().unwrap(),
        }
    }

    /// Declare an entity set over a local entity type name.
    pub fn entity_set(&mut self, name: &str, entity_type: &str) -> &mut Self {
        let target = TypeName::new(self.namespace.clone(), entity_type);
        self.sets.push(EntitySet::new(name, target));
        self
    }

    pub fn build(self) -> ModelResult<Model> {
        let mut entity_index = HashMap::new();
        let mut complex_index = HashMap::new();

        for (i, entity) in self.entities.iter().enumerate() {
            let qualified = entity.name.qualified();
            if entity_index.insert(qualified.clone(), i).is_some() {
                return Err(ModelError::DuplicateType { name: qualified });
            }
        }
        for (i, complex) in self.complexes.iter().enumerate() {
            let qualified = complex.name.qualified();
            if entity_index.contains_key(&qualified)
                || complex_index.insert(qualified.clone(), i).is_some()
            {
                return Err(ModelError::DuplicateType { name: qualified });
            }
        }

        let mut set_index = HashMap::new();
        for (i, set) in self.sets.iter().enumerate() {
            if set_index.insert(set.name.clone(), i).is_some() {
                return Err(ModelError::DuplicateEntitySet {
                    name: set.name.clone(),
                });
            }
            if !entity_index.contains_key(&set.entity_type.qualified()) {
                return Err(ModelError::UnknownEntitySetType {
                    entity_set: set.name.clone(),
                    entity_type: set.entity_type.qualified(),
                });
            }
        }

        for entity in &self.entities {
            for key in &entity.key {
                if entity.property(key).is_none() {
                    return Err(ModelError::UnknownKeyProperty {
                        entity_type: entity.name.qualified(),
                        property: key.clone(),
                    });
                }
            }
            for nav in &entity.navigation {
                if !entity_index.contains_key(&nav.target.qualified()) {
                    return Err(ModelError::UnknownNavigationTarget {
                        entity_type: entity.name.qualified(),
                        property: nav.name.clone(),
                        target: nav.target.qualified(),
                    });
                }
            }
            check_properties(
                &entity.name,
                &entity.properties,
                &entity_index,
                &complex_index,
            )?;
        }
        for complex in &self.complexes {
            check_properties(
                &complex.name,
                &complex.properties,
                &entity_index,
                &complex_index,
            )?;
        }

        Ok(Model {
            namespace: self.namespace,
            entity_types: self.entities.into_iter().map(Arc::new).collect(),
            complex_types: self.complexes.into_iter().map(Arc::new).collect(),
            entity_sets: self.sets,
            entity_index,
            complex_index,
            set_index,
        })
    }
}

fn check_properties(
    declaring: &TypeName,
    properties: &[StructuralProperty],
    entity_index: &HashMap<String, usize>,
    complex_index: &HashMap<String, usize>,
) -> ModelResult<()> {
    for property in properties {
        check_property_ref(declaring, &property.name, &property.type_ref, entity_index, complex_index)?;
    }
    Ok(())
}

fn check_property_ref(
    declaring: &TypeName,
    property: &str,
    type_ref: &TypeRef,
    entity_index: &HashMap<String, usize>,
    complex_index: &HashMap<String, usize>,
) -> ModelResult<()> {
    match type_ref {
        TypeRef::Primitive(_) => Ok(()),
        TypeRef::Entity(name) => Err(ModelError::EntityTypedProperty {
            declaring_type: declaring.qualified(),
            property: property.to_string(),
            referenced: name.qualified(),
        }),
        TypeRef::Complex(name) => {
            if complex_index.contains_key(&name.qualified()) {
                Ok(())
            } else if entity_index.contains_key(&name.qualified()) {
                Err(ModelError::EntityTypedProperty {
                    declaring_type: declaring.qualified(),
                    property: property.to_string(),
                    referenced: name.qualified(),
                })
            } else {
                Err(ModelError::UnknownPropertyType {
                    declaring_type: declaring.qualified(),
                    property: property.to_string(),
                    referenced: name.qualified(),
                })
            }
        }
        TypeRef::Collection(element) => {
            check_property_ref(declaring, property, element, entity_index, complex_index)
        }
    }
}

/// Fluent face over one in-progress entity type declaration.
pub struct EntityTypeBuilder<'a> {
    entity: &'a mut EntityType,
    namespace: String,
}

impl EntityTypeBuilder<'_> {
    pub fn key(self, name: &str) -> Self {
        self.entity.key.push(name.to_string());
        self
    }

    /// Declare a nullable structural property.
    pub fn property(self, name: &str, type_ref: impl Into<TypeRef>) -> Self {
        self.entity
            .properties
            .push(StructuralProperty::new(name, type_ref));
        self
    }

    /// Declare a non-nullable structural property.
    pub fn required_property(self, name: &str, type_ref: impl Into<TypeRef>) -> Self {
        self.entity
            .properties
            .push(StructuralProperty::new(name, type_ref).required());
        self
    }

    /// Declare a navigation property in full.
    pub fn navigation(self, nav: NavigationProperty) -> Self {
        self.entity.navigation.push(nav);
        self
    }

    /// Single-valued navigation to a local entity type name.
    pub fn navigation_single(self, name: &str, target: &str) -> Self {
        let target = TypeName::new(self.namespace.clone(), target);
        self.entity
            .navigation
            .push(NavigationProperty::single(name, target));
        self
    }

    /// Collection-valued navigation to a local entity type name.
    pub fn navigation_many(self, name: &str, target: &str) -> Self {
        let target = TypeName::new(self.namespace.clone(), target);
        self.entity
            .navigation
            .push(NavigationProperty::many(name, target));
        self
    }
}

/// Fluent face over one in-progress complex type declaration.
pub struct ComplexTypeBuilder<'a> {
    complex: &'a mut ComplexType,
}

impl ComplexTypeBuilder<'_> {
    pub fn property(self, name: &str, type_ref: impl Into<TypeRef>) -> Self {
        self.complex
            .properties
            .push(StructuralProperty::new(name, type_ref));
        self
    }

    pub fn required_property(self, name: &str, type_ref: impl Into<TypeRef>) -> Self {
        self.complex
            .properties
            .push(StructuralProperty::new(name, type_ref).required());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::PrimitiveKind;

    #[test]
    fn test_duplicate_type_is_rejected() {
        let mut builder = ModelBuilder::new("Demo");
        builder.entity_type("Person");
        builder.complex_type("Person");
        assert_eq!(
            builder.build().unwrap_err(),
            ModelError::DuplicateType {
                name: "Demo.Person".to_string()
            }
        );
    }

    #[test]
    fn test_entity_set_must_reference_declared_entity() {
        let mut builder = ModelBuilder::new("Demo");
        builder.entity_set("People", "Person");
        assert_eq!(
            builder.build().unwrap_err(),
            ModelError::UnknownEntitySetType {
                entity_set: "People".to_string(),
                entity_type: "Demo.Person".to_string(),
            }
        );
    }

    #[test]
    fn test_key_must_be_declared_property() {
        let mut builder = ModelBuilder::new("Demo");
        builder.entity_type("Person").key("PerId");
        assert_eq!(
            builder.build().unwrap_err(),
            ModelError::UnknownKeyProperty {
                entity_type: "Demo.Person".to_string(),
                property: "PerId".to_string(),
            }
        );
    }

    #[test]
    fn test_navigation_target_must_resolve() {
        let mut builder = ModelBuilder::new("Demo");
        builder
            .entity_type("Person")
            .navigation_single("Order", "Order");
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownNavigationTarget {
                entity_type: "Demo.Person".to_string(),
                property: "Order".to_string(),
                target: "Demo.Order".to_string(),
            }
        );
    }

    #[test]
    fn test_complex_property_must_resolve() {
        let mut builder = ModelBuilder::new("Demo");
        builder
            .entity_type("Person")
            .property("HomeAddress", TypeRef::complex("Demo.Address"));
        assert!(matches!(
            builder.build().unwrap_err(),
            ModelError::UnknownPropertyType { .. }
        ));
    }

    #[test]
    fn test_entity_typed_structural_property_is_rejected() {
        let mut builder = ModelBuilder::new("Demo");
        builder.entity_type("Order");
        builder
            .entity_type("Person")
            .property("Order", TypeRef::complex("Demo.Order"));
        assert!(matches!(
            builder.build().unwrap_err(),
            ModelError::EntityTypedProperty { .. }
        ));
    }

    #[test]
    fn test_well_formed_model_builds() {
        let mut builder = ModelBuilder::new("Demo");
        builder
            .complex_type("Address")
            .property("Street", PrimitiveKind::String);
        builder
            .entity_type("Person")
            .key("PerId")
            .required_property("PerId", PrimitiveKind::Int32)
            .property("HomeAddress", TypeRef::complex("Demo.Address"))
            .property(
                "Nicknames",
                TypeRef::collection_of(PrimitiveKind::String.into()),
            );
        builder.entity_set("People", "Person");
        let model = builder.build().unwrap();
        assert_eq!(model.entity_types().len(), 1);
        assert_eq!(model.complex_types().len(), 1);
        assert_eq!(
            model.entity_set("People").unwrap().entity_type.qualified(),
            "Demo.Person"
        );
    }
}
