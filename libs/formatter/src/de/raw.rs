//! Raw value deserialization.

use edm::{PrimitiveKind, Value};
use wire::MessageReader;

use crate::coerce;
use crate::error::FormatResult;

/// Reads a bare scalar body under the primitive kind the request path
/// resolved to. No JSON wrapper is expected; the whole body is the
/// lexical form of one value.
pub struct RawValueDeserializer;

impl RawValueDeserializer {
    pub fn read(
        &self,
        reader: &MessageReader<'_>,
        declared: PrimitiveKind,
    ) -> FormatResult<Value> {
        let text = reader.read_raw_value()?;
        coerce::parse_raw_value(&text, declared).map(Value::Scalar)
    }
}
