//! Complex value and single-property deserialization.

use std::sync::Arc;

use edm::{ComplexType, TypeRef, Value};
use wire::{MessageReader, WireValue};

use crate::context::DeserializerContext;
use crate::de::{record_from_wire, wire_to_value, Deserializer};
use crate::error::{FormatError, FormatResult};
use crate::payload_kind::PayloadKind;

/// Reads one complex value, standalone or nested inside another record.
pub struct ComplexDeserializer {
    complex: Arc<ComplexType>,
}

impl ComplexDeserializer {
    pub(crate) fn new(complex: Arc<ComplexType>) -> Self {
        Self { complex }
    }

    /// Materialize one inline wire value as an instance of the bound
    /// complex type.
    pub fn read_inline(
        &self,
        wire: &WireValue,
        ctx: &DeserializerContext,
    ) -> FormatResult<Value> {
        match wire {
            WireValue::Null => Ok(Value::Null),
            WireValue::Structured(record) => {
                record_from_wire(self.complex.name(), self.complex.properties(), record, ctx)
                    .map(Value::Record)
            }
            other => Err(FormatError::invalid_argument(
                "item",
                format!(
                    "a complex value requires a structured value, found {}",
                    other.shape()
                ),
            )),
        }
    }
}

impl Deserializer for ComplexDeserializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Complex
    }

    fn read(
        &self,
        reader: &MessageReader<'_>,
        ctx: &DeserializerContext,
    ) -> FormatResult<Value> {
        let (_, wire) = reader.read_property()?;
        self.read_inline(&wire, ctx)
    }
}

/// Reads one named property payload under its declared type.
pub struct PropertyDeserializer {
    type_ref: TypeRef,
}

impl PropertyDeserializer {
    pub(crate) fn new(type_ref: TypeRef) -> Self {
        Self { type_ref }
    }
}

impl Deserializer for PropertyDeserializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Property
    }

    fn read(
        &self,
        reader: &MessageReader<'_>,
        ctx: &DeserializerContext,
    ) -> FormatResult<Value> {
        let (_, wire) = reader.read_property()?;
        wire_to_value(&wire, &self.type_ref, ctx)
    }
}
