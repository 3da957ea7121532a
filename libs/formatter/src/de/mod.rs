//! Payload-kind deserializers.
//!
//! The read-side mirror of [`crate::ser`]: one deserializer family per
//! payload kind, bound to its schema type at construction. Wire shapes
//! are checked against the declared type before any value is built, so
//! a payload that lies about its type never becomes a half-typed graph.

mod complex;
mod entry;
mod links;
mod raw;

pub use complex::{ComplexDeserializer, PropertyDeserializer};
pub use entry::{EntryDeserializer, FeedDeserializer};
pub use links::{ReferenceLinkCollectionDeserializer, ReferenceLinkDeserializer};
pub use raw::RawValueDeserializer;

use edm::{Record, StructuralProperty, TypeName, TypeRef, Value};
use wire::{MessageReader, WireRecord, WireValue};

use crate::coerce;
use crate::context::DeserializerContext;
use crate::error::{FormatError, FormatResult};
use crate::payload_kind::PayloadKind;

/// A reader for one payload kind, bound to one schema type.
pub trait Deserializer: Send + Sync {
    fn payload_kind(&self) -> PayloadKind;

    /// Read one payload into a domain value, checking every wire shape
    /// against the declared schema type along the way.
    fn read(&self, reader: &MessageReader<'_>, ctx: &DeserializerContext)
        -> FormatResult<Value>;
}

/// Convert one wire value under its declared schema type.
///
/// Complex targets are always routed through the bound complex
/// deserializer, whatever shape arrived, so a scalar standing where a
/// structured value belongs is rejected with the offending shape named.
pub(crate) fn wire_to_value(
    wire: &WireValue,
    declared: &TypeRef,
    ctx: &DeserializerContext,
) -> FormatResult<Value> {
    match (wire, declared) {
        (WireValue::Null, _) => Ok(Value::Null),
        (wire, TypeRef::Complex(name)) => {
            let deserializer = ctx
                .deserializers()
                .complex_deserializer(name)
                .ok_or_else(|| FormatError::type_not_in_model(name.qualified()))?;
            deserializer.read_inline(wire, ctx)
        }
        (WireValue::Scalar(scalar), TypeRef::Primitive(kind)) => {
            coerce::scalar_from_wire(scalar, *kind).map(Value::Scalar)
        }
        (WireValue::Collection(items), TypeRef::Collection(element)) => items
            .iter()
            .map(|item| wire_to_value(item, element, ctx))
            .collect::<FormatResult<Vec<_>>>()
            .map(Value::Collection),
        (wire, declared) => Err(FormatError::invalid_argument(
            "item",
            format!(
                "a value of shape '{}' cannot be read as '{}'",
                wire.shape(),
                declared.qualified_name()
            ),
        )),
    }
}

/// Materialize a wire record against its declared structural properties.
///
/// Undeclared wire properties fail the read. Declared properties the
/// payload omits are filled with their defaults, so the returned record
/// always carries every declared property.
pub(crate) fn record_from_wire(
    declaring: &TypeName,
    properties: &[StructuralProperty],
    wire: &WireRecord,
    ctx: &DeserializerContext,
) -> FormatResult<Record> {
    if let Some(found) = &wire.type_name {
        if *found != declaring.qualified() {
            return Err(FormatError::type_mismatch(found, &declaring.qualified()));
        }
    }
    for property in wire.properties() {
        if !properties.iter().any(|p| p.name == property.name) {
            return Err(FormatError::unknown_property(
                &property.name,
                &declaring.qualified(),
            ));
        }
    }

    let mut record = Record::new(declaring.clone());
    for property in properties {
        let value = match wire.property(&property.name) {
            Some(WireValue::Null) => {
                if !property.nullable {
                    return Err(FormatError::non_nullable_property(
                        &property.name,
                        &declaring.qualified(),
                    ));
                }
                Value::Null
            }
            Some(wire_value) => wire_to_value(wire_value, &property.type_ref, ctx)?,
            None => default_for(property),
        };
        record.set(&property.name, value);
    }
    Ok(record)
}

/// The value a declared property takes when the payload omits it.
fn default_for(property: &StructuralProperty) -> Value {
    if property.nullable {
        return Value::Null;
    }
    match &property.type_ref {
        TypeRef::Primitive(kind) => kind.default_value(),
        TypeRef::Complex(name) | TypeRef::Entity(name) => {
            Value::Record(Record::new(name.clone()))
        }
        TypeRef::Collection(_) => Value::Collection(Vec::new()),
    }
}
