//! Declared properties of entity and complex types.

use serde::{Deserialize, Serialize};

use crate::name::TypeName;
use crate::type_ref::TypeRef;

/// A structural (data-carrying) property declaration.
///
/// Properties are nullable unless marked otherwise; an absent nullable
/// property reads back as null, an absent non-nullable one as the
/// primitive kind's zero default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralProperty {
    pub name: String,
    pub type_ref: TypeRef,
    pub nullable: bool,
}

impl StructuralProperty {
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            nullable: true,
        }
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// A navigation property: a named relationship to another entity type.
///
/// `link_required` marks navigation properties that written entries must
/// carry a generated navigation link for; the link itself comes from the
/// host's link generator, never from this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationProperty {
    pub name: String,
    pub target: TypeName,
    pub is_collection: bool,
    pub link_required: bool,
}

impl NavigationProperty {
    /// Single-valued relationship, link emission on.
    pub fn single(name: impl Into<String>, target: TypeName) -> Self {
        Self {
            name: name.into(),
            target,
            is_collection: false,
            link_required: true,
        }
    }

    /// Collection-valued relationship, link emission on.
    pub fn many(name: impl Into<String>, target: TypeName) -> Self {
        Self {
            name: name.into(),
            target,
            is_collection: true,
            link_required: true,
        }
    }

    /// Suppress navigation-link emission for this property.
    pub fn without_link(mut self) -> Self {
        self.link_required = false;
        self
    }
}
