//! Payload-kind serializers.
//!
//! One serializer family per payload kind, each instance bound to exactly
//! one schema type at construction so the declared-property walk is
//! resolved once, not per write. Nested structured values are delegated
//! through the provider on the context, never constructed locally.

mod complex;
mod document;
mod entry;
mod error;
mod links;
mod property;

pub use complex::ComplexSerializer;
pub use document::{service_document, ServiceDocumentSerializer};
pub use entry::{EntrySerializer, FeedSerializer};
pub use error::ErrorSerializer;
pub use links::{ReferenceLinkCollectionSerializer, ReferenceLinkSerializer};
pub use property::{PropertySerializer, RawValueSerializer};

use edm::{Record, StructuralProperty, TypeName, TypeRef, Value};
use wire::{MessageWriter, WireValue};

use crate::coerce;
use crate::context::SerializerContext;
use crate::error::{FormatError, FormatResult};
use crate::payload::Payload;
use crate::payload_kind::PayloadKind;

/// A writer for one payload kind, bound to one schema type.
pub trait Serializer: Send + Sync {
    fn payload_kind(&self) -> PayloadKind;

    /// Write the payload through the wire grammar. Fails fast on the first
    /// contract violation; no partial recovery is attempted.
    fn write(
        &self,
        payload: &Payload,
        writer: &mut MessageWriter,
        ctx: &SerializerContext,
    ) -> FormatResult<()>;
}

/// Convert one domain value under its declared schema type.
pub(crate) fn value_to_wire(
    value: &Value,
    declared: &TypeRef,
    ctx: &SerializerContext,
) -> FormatResult<WireValue> {
    match (value, declared) {
        (Value::Null, _) => Ok(WireValue::Null),
        (Value::Scalar(scalar), TypeRef::Primitive(kind)) => {
            Ok(WireValue::Scalar(coerce::scalar_to_wire(scalar, *kind)?))
        }
        (Value::Record(record), TypeRef::Complex(name)) => {
            let serializer = ctx
                .serializers()
                .complex_serializer(name)
                .ok_or_else(|| FormatError::type_not_in_model(name.qualified()))?;
            Ok(WireValue::Structured(serializer.record_to_wire(record, ctx)?))
        }
        (Value::Collection(items), TypeRef::Collection(element)) => items
            .iter()
            .map(|item| value_to_wire(item, element, ctx))
            .collect::<FormatResult<Vec<_>>>()
            .map(WireValue::Collection),
        (value, declared) => Err(FormatError::cannot_write_shape(
            value.shape(),
            &format!("a value of type '{}'", declared.qualified_name()),
        )),
    }
}

/// Walk a record against its declared structural properties, in
/// declaration order. Record fields with no declared counterpart fail the
/// write; declared properties the record does not carry are omitted and
/// read back as defaults.
pub(crate) fn properties_to_wire(
    declaring: &TypeName,
    properties: &[StructuralProperty],
    record: &Record,
    ctx: &SerializerContext,
) -> FormatResult<Vec<(String, WireValue)>> {
    for (field, _) in record.fields() {
        if !properties.iter().any(|p| p.name == field) {
            return Err(FormatError::unknown_property(field, &declaring.qualified()));
        }
    }

    let mut written = Vec::with_capacity(record.len());
    for property in properties {
        let Some(value) = record.field(&property.name) else {
            continue;
        };
        if value.is_null() && !property.nullable {
            return Err(FormatError::non_nullable_property(
                &property.name,
                &declaring.qualified(),
            ));
        }
        written.push((
            property.name.clone(),
            value_to_wire(value, &property.type_ref, ctx)?,
        ));
    }
    Ok(written)
}
