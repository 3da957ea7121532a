//! Entity reference link serialization, single and collection.

use wire::MessageWriter;

use crate::context::SerializerContext;
use crate::error::{FormatError, FormatResult};
use crate::payload::Payload;
use crate::payload_kind::PayloadKind;
use crate::ser::Serializer;

/// Writes one relationship target as `{"url": "..."}`.
pub struct ReferenceLinkSerializer;

impl Serializer for ReferenceLinkSerializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::EntityReferenceLink
    }

    fn write(
        &self,
        payload: &Payload,
        writer: &mut MessageWriter,
        _ctx: &SerializerContext,
    ) -> FormatResult<()> {
        let target = match payload {
            Payload::Ref(target) => target,
            other => {
                return Err(FormatError::cannot_write_shape(
                    other.shape(),
                    "an entity reference link",
                ))
            }
        };
        writer
            .write_entity_reference_link(target)
            .map_err(FormatError::from)
    }
}

/// Writes a set of relationship targets under the `value` wrapper.
pub struct ReferenceLinkCollectionSerializer;

impl Serializer for ReferenceLinkCollectionSerializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::EntityReferenceLinkCollection
    }

    fn write(
        &self,
        payload: &Payload,
        writer: &mut MessageWriter,
        _ctx: &SerializerContext,
    ) -> FormatResult<()> {
        let targets = match payload {
            Payload::Refs(targets) => targets,
            other => {
                return Err(FormatError::cannot_write_shape(
                    other.shape(),
                    "an entity reference link collection",
                ))
            }
        };
        writer
            .write_entity_reference_links(targets)
            .map_err(FormatError::from)
    }
}
