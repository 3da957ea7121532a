//! Complex value serialization.

use std::sync::Arc;

use edm::{ComplexType, Record, Value};
use wire::{MessageWriter, WireRecord, WireValue};

use crate::context::SerializerContext;
use crate::error::{FormatError, FormatResult};
use crate::metadata_level::MetadataLevel;
use crate::path::ResourcePath;
use crate::payload::Payload;
use crate::payload_kind::PayloadKind;
use crate::ser::{properties_to_wire, Serializer};

/// Writes one complex value: the entry walk minus identity and links.
///
/// A top-level complex payload is written as a single named property; the
/// name comes from the terminal property segment of the request path,
/// falling back to the complex type's local name.
pub struct ComplexSerializer {
    complex: Arc<ComplexType>,
}

impl ComplexSerializer {
    pub(crate) fn new(complex: Arc<ComplexType>) -> Self {
        Self { complex }
    }

    /// The wire record for one complex value, used inline by entry and
    /// collection walks.
    pub fn record_to_wire(
        &self,
        record: &Record,
        ctx: &SerializerContext,
    ) -> FormatResult<WireRecord> {
        if let Some(declared) = record.type_name() {
            if declared != self.complex.name() {
                return Err(FormatError::type_mismatch(
                    &declared.qualified(),
                    &self.complex.name().qualified(),
                ));
            }
        }

        let annotated = match ctx.metadata_level() {
            MetadataLevel::Full => Some(self.complex.name().qualified()),
            _ => None,
        };
        let mut wire = WireRecord::new(annotated);
        for (name, value) in
            properties_to_wire(self.complex.name(), self.complex.properties(), record, ctx)?
        {
            wire.push_property(name, value);
        }
        Ok(wire)
    }

    fn value_to_inline(&self, value: &Value, ctx: &SerializerContext) -> FormatResult<WireValue> {
        match value {
            Value::Null => Ok(WireValue::Null),
            Value::Record(record) => Ok(WireValue::Structured(self.record_to_wire(record, ctx)?)),
            other => Err(FormatError::invalid_argument(
                "value",
                format!("a complex value requires a record, found {}", other.shape()),
            )),
        }
    }
}

impl Serializer for ComplexSerializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Complex
    }

    fn write(
        &self,
        payload: &Payload,
        writer: &mut MessageWriter,
        ctx: &SerializerContext,
    ) -> FormatResult<()> {
        let value = match payload {
            Payload::Value(value) => value,
            other => {
                return Err(FormatError::cannot_write_shape(
                    other.shape(),
                    "a complex value",
                ))
            }
        };
        let name = ctx
            .path()
            .and_then(ResourcePath::property_name)
            .unwrap_or_else(|| self.complex.name().name());
        let inline = self.value_to_inline(value, ctx)?;
        writer.write_property(name, &inline).map_err(FormatError::from)
    }
}
