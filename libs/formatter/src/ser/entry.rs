//! Entry and feed serialization.

use std::sync::Arc;

use edm::{EntityType, Record, Value};
use wire::{MessageWriter, WireRecord};

use crate::context::SerializerContext;
use crate::error::{FormatError, FormatResult};
use crate::metadata_level::MetadataLevel;
use crate::payload::Payload;
use crate::payload_kind::PayloadKind;
use crate::ser::{properties_to_wire, Serializer};

/// Writes one entity as an annotated entry record.
///
/// The structural walk follows the entity type's property declaration
/// order. Annotations depend on the negotiated metadata level: at `None`
/// nothing is emitted, not even navigation links; at `Minimal` the links
/// the generator supplies are; `Full` adds the qualified type name.
pub struct EntrySerializer {
    entity: Arc<EntityType>,
}

impl EntrySerializer {
    pub(crate) fn new(entity: Arc<EntityType>) -> Self {
        Self { entity }
    }

    /// Build the wire record for one entity, for top-level entries and
    /// feed members alike.
    pub fn entry_record(
        &self,
        record: &Record,
        ctx: &SerializerContext,
    ) -> FormatResult<WireRecord> {
        if let Some(declared) = record.type_name() {
            if declared != self.entity.name() {
                return Err(FormatError::type_mismatch(
                    &declared.qualified(),
                    &self.entity.name().qualified(),
                ));
            }
        }

        let annotated = match ctx.metadata_level() {
            MetadataLevel::Full => Some(self.entity.name().qualified()),
            _ => None,
        };
        let mut wire = WireRecord::new(annotated);

        if ctx.metadata_level() != MetadataLevel::None {
            wire.id = ctx.links().id_link(record, &self.entity, ctx);
            wire.edit_link = ctx.links().edit_link(record, &self.entity, ctx);
            for navigation in self.entity.navigation_properties() {
                if !navigation.link_required {
                    continue;
                }
                match ctx.links().navigation_link(record, navigation, ctx) {
                    Some(target) => wire.push_link(&navigation.name, target),
                    None => {
                        return Err(FormatError::missing_link(
                            &navigation.name,
                            &self.entity.name().qualified(),
                        ))
                    }
                }
            }
        }

        for (name, value) in
            properties_to_wire(self.entity.name(), self.entity.properties(), record, ctx)?
        {
            wire.push_property(name, value);
        }
        Ok(wire)
    }
}

impl Serializer for EntrySerializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Entry
    }

    fn write(
        &self,
        payload: &Payload,
        writer: &mut MessageWriter,
        ctx: &SerializerContext,
    ) -> FormatResult<()> {
        let record = match payload {
            Payload::Value(Value::Null) => {
                return Err(FormatError::null_payload(PayloadKind::Entry))
            }
            Payload::Value(Value::Record(record)) => record,
            other => return Err(FormatError::cannot_write_shape(other.shape(), "an entry")),
        };
        let wire = self.entry_record(record, ctx)?;
        writer.write_entry(&wire).map_err(FormatError::from)
    }
}

/// Writes a collection of entities as a feed.
pub struct FeedSerializer {
    element: Arc<EntityType>,
}

impl FeedSerializer {
    pub(crate) fn new(element: Arc<EntityType>) -> Self {
        Self { element }
    }
}

impl Serializer for FeedSerializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Feed
    }

    fn write(
        &self,
        payload: &Payload,
        writer: &mut MessageWriter,
        ctx: &SerializerContext,
    ) -> FormatResult<()> {
        let members = match payload {
            Payload::Value(Value::Null) => {
                return Err(FormatError::null_payload(PayloadKind::Feed))
            }
            Payload::Value(Value::Collection(members)) => members,
            other => return Err(FormatError::cannot_write_shape(other.shape(), "a feed")),
        };

        let entry = ctx
            .serializers()
            .entry_serializer(self.element.name())
            .ok_or_else(|| FormatError::type_not_in_model(self.element.name().qualified()))?;

        let mut records = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Value::Record(record) => records.push(entry.entry_record(record, ctx)?),
                Value::Null => {
                    return Err(FormatError::serialization(
                        "A feed cannot contain a null entry.",
                    ))
                }
                other => {
                    return Err(FormatError::cannot_write_shape(
                        other.shape(),
                        "an entry inside a feed",
                    ))
                }
            }
        }
        writer.write_feed(&records).map_err(FormatError::from)
    }
}
