//! Payload kinds served by the formatter.

use std::fmt;

use edm::TypeRef;
use num_enum::TryFromPrimitive;

/// The shape category of a wire payload.
///
/// The kind decides which converter family applies and which wire-grammar
/// entry point carries the payload. The set is closed: hosts select from
/// these nine shapes, nothing is pluggable.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum PayloadKind {
    /// A single entity, written as one annotated record.
    Entry = 1,

    /// A collection of entities, written as a wrapped array of entries.
    Feed = 2,

    /// A single named primitive (or primitive/complex collection) property.
    Property = 3,

    /// A single named complex value.
    Complex = 4,

    /// One relationship target address.
    EntityReferenceLink = 5,

    /// A collection of relationship target addresses.
    EntityReferenceLinkCollection = 6,

    /// The service document listing the model's addressable collections.
    ServiceDocument = 7,

    /// The structured error payload.
    Error = 8,

    /// A bare scalar without any JSON wrapper.
    RawValue = 9,
}

impl PayloadKind {
    /// Every payload kind, in discriminant order.
    pub const ALL: [PayloadKind; 9] = [
        PayloadKind::Entry,
        PayloadKind::Feed,
        PayloadKind::Property,
        PayloadKind::Complex,
        PayloadKind::EntityReferenceLink,
        PayloadKind::EntityReferenceLinkCollection,
        PayloadKind::ServiceDocument,
        PayloadKind::Error,
        PayloadKind::RawValue,
    ];

    /// Classify a schema type reference into the kind that carries it.
    ///
    /// Entities become entries, entity collections become feeds, complex
    /// types keep their own kind, and everything else (primitives and
    /// collections of primitives or complex values) travels as a named
    /// property.
    pub fn for_target(target: &TypeRef) -> PayloadKind {
        match target {
            TypeRef::Entity(_) => PayloadKind::Entry,
            TypeRef::Complex(_) => PayloadKind::Complex,
            TypeRef::Collection(element) if element.is_entity() => PayloadKind::Feed,
            TypeRef::Primitive(_) | TypeRef::Collection(_) => PayloadKind::Property,
        }
    }

    /// Human name used in failure messages ("Cannot serialize a null
    /// 'entry'." style).
    pub fn name(&self) -> &'static str {
        match self {
            PayloadKind::Entry => "entry",
            PayloadKind::Feed => "feed",
            PayloadKind::Property => "property",
            PayloadKind::Complex => "complex value",
            PayloadKind::EntityReferenceLink => "entity reference link",
            PayloadKind::EntityReferenceLinkCollection => "entity reference link collection",
            PayloadKind::ServiceDocument => "service document",
            PayloadKind::Error => "error",
            PayloadKind::RawValue => "raw value",
        }
    }

    /// Whether a null top-level graph has a representation for this kind.
    ///
    /// Named property payloads can carry an explicit null; entries, feeds,
    /// and bare values cannot, and a null graph for those kinds must be
    /// rejected before any bytes are produced.
    pub fn supports_null_graph(&self) -> bool {
        matches!(self, PayloadKind::Property | PayloadKind::Complex)
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
