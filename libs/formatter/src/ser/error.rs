//! Top-level error payload serialization.

use wire::MessageWriter;

use crate::context::SerializerContext;
use crate::error::{FormatError, FormatResult};
use crate::error_translation::to_structured_error;
use crate::payload::Payload;
use crate::payload_kind::PayloadKind;
use crate::ser::Serializer;

/// Writes an `{"error": ...}` body from a host failure record or from
/// an already normalized error. The inner error block is emitted only
/// when the translation produced one.
pub struct ErrorSerializer;

impl Serializer for ErrorSerializer {
    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::Error
    }

    fn write(
        &self,
        payload: &Payload,
        writer: &mut MessageWriter,
        _ctx: &SerializerContext,
    ) -> FormatResult<()> {
        match payload {
            Payload::Error(record) => {
                let error = to_structured_error(record);
                let include_debug = error.inner.is_some();
                writer
                    .write_error(&error, include_debug)
                    .map_err(FormatError::from)
            }
            Payload::StructuredError(error) => {
                let include_debug = error.inner.is_some();
                writer
                    .write_error(error, include_debug)
                    .map_err(FormatError::from)
            }
            other => Err(FormatError::unsupported_error_graph(other.shape())),
        }
    }
}
