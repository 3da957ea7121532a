//! Schema validation failures.

use thiserror::Error;

/// Why a model failed to build.
///
/// Raised by [`ModelBuilder::build`](crate::ModelBuilder::build) when a
/// declaration references something the model does not contain. Building
/// never panics; a host wiring up its schema gets the full story in the
/// error value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("The type '{name}' is declared more than once")]
    DuplicateType { name: String },

    #[error("The entity set '{name}' is declared more than once")]
    DuplicateEntitySet { name: String },

    #[error("The entity set '{entity_set}' references the entity type '{entity_type}', which is not declared by the model")]
    UnknownEntitySetType {
        entity_set: String,
        entity_type: String,
    },

    #[error("The key property '{property}' of entity type '{entity_type}' is not a declared structural property")]
    UnknownKeyProperty {
        entity_type: String,
        property: String,
    },

    #[error("The navigation property '{property}' of entity type '{entity_type}' targets '{target}', which is not a declared entity type")]
    UnknownNavigationTarget {
        entity_type: String,
        property: String,
        target: String,
    },

    #[error("The property '{property}' of type '{declaring_type}' references '{referenced}', which is not declared by the model")]
    UnknownPropertyType {
        declaring_type: String,
        property: String,
        referenced: String,
    },

    #[error("The property '{property}' of type '{declaring_type}' is declared with entity type '{referenced}'; entity-typed data must be modeled as a navigation property")]
    EntityTypedProperty {
        declaring_type: String,
        property: String,
        referenced: String,
    },
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
