//! Single-property and raw-value serialization.

use edm::{TypeRef, Value};
use wire::MessageWriter;

use crate::coerce;
use crate::context::SerializerContext;
use crate::error::{FormatError, FormatResult};
use crate::path::ResourcePath;
use crate::payload::Payload;
use crate::payload_kind::PayloadKind;
use crate::ser::{value_to_wire, Serializer};

/// Writes one named property: a primitive, or a collection of primitives
/// or complex values. The property name comes from the terminal property
/// segment of the request path, falling back to `"value"`.
pub struct PropertySerializer {
    type_ref: TypeRef,
}

impl PropertySerializer {
    pub(crate) fn new(type_ref: TypeRef) -> Self {
        Self { type_ref }
    }
}

impl Serializer for PropertySerializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Property
    }

    fn write(
        &self,
        payload: &Payload,
        writer: &mut MessageWriter,
        ctx: &SerializerContext,
    ) -> FormatResult<()> {
        let value = match payload {
            Payload::Value(value) => value,
            other => return Err(FormatError::cannot_write_shape(other.shape(), "a property")),
        };
        let name = ctx
            .path()
            .and_then(ResourcePath::property_name)
            .unwrap_or("value");
        let wire = value_to_wire(value, &self.type_ref, ctx)?;
        writer.write_property(name, &wire).map_err(FormatError::from)
    }
}

/// Writes a bare scalar with no JSON wrapper at all.
pub struct RawValueSerializer;

impl Serializer for RawValueSerializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::RawValue
    }

    fn write(
        &self,
        payload: &Payload,
        writer: &mut MessageWriter,
        _ctx: &SerializerContext,
    ) -> FormatResult<()> {
        let scalar = match payload {
            Payload::Value(Value::Null) => {
                return Err(FormatError::null_payload(PayloadKind::RawValue))
            }
            Payload::Value(Value::Scalar(scalar)) => scalar,
            other => {
                return Err(FormatError::cannot_write_shape(
                    other.shape(),
                    "a raw value",
                ))
            }
        };
        writer
            .write_raw_value(&coerce::wire_form(scalar))
            .map_err(FormatError::from)
    }
}
