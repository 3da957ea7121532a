//! Service document serialization.

use edm::Model;
use wire::{MessageWriter, ServiceDocument};

use crate::context::SerializerContext;
use crate::error::{FormatError, FormatResult};
use crate::payload::Payload;
use crate::payload_kind::PayloadKind;
use crate::ser::Serializer;

/// Builds the service document for a schema: one collection per entity
/// set, in declaration order, with the set name doubling as the href.
pub fn service_document(model: &Model) -> ServiceDocument {
    let mut document = ServiceDocument::new();
    for set in model.entity_sets() {
        document = document.with(set.name.clone(), set.name.clone());
    }
    document
}

/// Writes the listing of collections the service exposes at its root.
pub struct ServiceDocumentSerializer;

impl Serializer for ServiceDocumentSerializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::ServiceDocument
    }

    fn write(
        &self,
        payload: &Payload,
        writer: &mut MessageWriter,
        _ctx: &SerializerContext,
    ) -> FormatResult<()> {
        let document = match payload {
            Payload::ServiceDocument(document) => document,
            other => {
                return Err(FormatError::cannot_write_shape(
                    other.shape(),
                    "a service document",
                ))
            }
        };
        writer
            .write_service_document(document)
            .map_err(FormatError::from)
    }
}
