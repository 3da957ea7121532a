//! References to schema shapes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::TypeName;
use crate::primitive::PrimitiveKind;

/// Identifies a schema shape by qualified name: a primitive kind, an
/// entity type, a complex type, or a collection of one of those.
///
/// A `TypeRef` is a reference, not a definition - resolving an entity or
/// complex name to its declared properties goes through
/// [`Model`](crate::Model). References are immutable and compared by
/// value; they are resolved once per schema and then reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Entity(TypeName),
    Complex(TypeName),
    Collection(Box<TypeRef>),
}

impl TypeRef {
    /// Entity reference from a qualified name string.
    pub fn entity(qualified: &str) -> Self {
        TypeRef::Entity(TypeName::parse(qualified))
    }

    /// Complex reference from a qualified name string.
    pub fn complex(qualified: &str) -> Self {
        TypeRef::Complex(TypeName::parse(qualified))
    }

    pub fn collection_of(element: TypeRef) -> Self {
        TypeRef::Collection(Box::new(element))
    }

    /// Qualified display name, e.g. `Edm.Int32`, `Demo.Person`,
    /// `Collection(Demo.Person)`.
    pub fn qualified_name(&self) -> String {
        self.to_string()
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, TypeRef::Entity(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, TypeRef::Complex(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, TypeRef::Collection(_))
    }

    /// Element reference of a collection, `None` for non-collections.
    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Collection(element) => Some(element),
            _ => None,
        }
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TypeRef::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => f.write_str(kind.qualified_name()),
            TypeRef::Entity(name) | TypeRef::Complex(name) => write!(f, "{name}"),
            TypeRef::Collection(element) => write!(f, "Collection({element})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_names() {
        assert_eq!(
            TypeRef::Primitive(PrimitiveKind::Int32).qualified_name(),
            "Edm.Int32"
        );
        assert_eq!(TypeRef::entity("Demo.Person").qualified_name(), "Demo.Person");
        assert_eq!(
            TypeRef::collection_of(TypeRef::entity("Demo.Person")).qualified_name(),
            "Collection(Demo.Person)"
        );
    }

    #[test]
    fn test_collection_element() {
        let feed = TypeRef::collection_of(TypeRef::entity("Demo.Person"));
        assert!(feed.is_collection());
        assert_eq!(feed.element(), Some(&TypeRef::entity("Demo.Person")));
        assert_eq!(TypeRef::entity("Demo.Person").element(), None);
    }
}
