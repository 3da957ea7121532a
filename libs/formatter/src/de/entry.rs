//! Entry and feed deserialization.

use std::sync::Arc;

use edm::{EntityType, Value};
use wire::{MessageReader, WireRecord};

use crate::context::DeserializerContext;
use crate::de::{record_from_wire, Deserializer};
use crate::error::{FormatError, FormatResult};
use crate::payload_kind::PayloadKind;

/// Reads one entry payload into a typed record.
pub struct EntryDeserializer {
    entity: Arc<EntityType>,
}

impl EntryDeserializer {
    pub(crate) fn new(entity: Arc<EntityType>) -> Self {
        Self { entity }
    }

    /// Materialize one entry record, for top-level entries and feed
    /// members alike.
    pub fn record_value(
        &self,
        wire: &WireRecord,
        ctx: &DeserializerContext,
    ) -> FormatResult<Value> {
        record_from_wire(self.entity.name(), self.entity.properties(), wire, ctx)
            .map(Value::Record)
    }
}

impl Deserializer for EntryDeserializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Entry
    }

    fn read(
        &self,
        reader: &MessageReader<'_>,
        ctx: &DeserializerContext,
    ) -> FormatResult<Value> {
        let wire = reader.read_entry()?;
        self.record_value(&wire, ctx)
    }
}

/// Reads a feed payload into a collection of typed records.
pub struct FeedDeserializer {
    element: Arc<EntityType>,
}

impl FeedDeserializer {
    pub(crate) fn new(element: Arc<EntityType>) -> Self {
        Self { element }
    }
}

impl Deserializer for FeedDeserializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Feed
    }

    fn read(
        &self,
        reader: &MessageReader<'_>,
        ctx: &DeserializerContext,
    ) -> FormatResult<Value> {
        let entry = ctx
            .deserializers()
            .entry_deserializer(self.element.name())
            .ok_or_else(|| FormatError::type_not_in_model(self.element.name().qualified()))?;
        let mut members = Vec::new();
        for wire in reader.read_feed()? {
            members.push(entry.record_value(&wire, ctx)?);
        }
        Ok(Value::Collection(members))
    }
}
