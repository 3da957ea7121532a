//! Primitive scalar kinds understood by the schema.

use serde::{Deserialize, Serialize};

use crate::value::{Scalar, Value};

/// Scalar kinds a structural property may declare.
///
/// Each kind has a stable qualified name in the `Edm` namespace used for
/// wire annotations and diagnostics. The set is closed: the wire grammar
/// and the conversion layer both match on it exhaustively.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// UTF-8 text
    String = 1,
    /// true / false
    Boolean = 2,
    /// 32-bit signed integer
    Int32 = 3,
    /// 64-bit signed integer
    Int64 = 4,
    /// IEEE-754 double
    Double = 5,
    /// Point in time, carried on the wire as RFC 3339 text in UTC
    DateTime = 6,
    /// 128-bit globally unique identifier
    Guid = 7,
    /// Opaque bytes, carried on the wire as base64 text
    Binary = 8,
}

impl PrimitiveKind {
    /// Qualified name used in wire type annotations, e.g. `Edm.Int32`.
    pub fn qualified_name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "Edm.String",
            PrimitiveKind::Boolean => "Edm.Boolean",
            PrimitiveKind::Int32 => "Edm.Int32",
            PrimitiveKind::Int64 => "Edm.Int64",
            PrimitiveKind::Double => "Edm.Double",
            PrimitiveKind::DateTime => "Edm.DateTime",
            PrimitiveKind::Guid => "Edm.Guid",
            PrimitiveKind::Binary => "Edm.Binary",
        }
    }

    pub fn from_qualified_name(name: &str) -> Option<Self> {
        match name {
            "Edm.String" => Some(PrimitiveKind::String),
            "Edm.Boolean" => Some(PrimitiveKind::Boolean),
            "Edm.Int32" => Some(PrimitiveKind::Int32),
            "Edm.Int64" => Some(PrimitiveKind::Int64),
            "Edm.Double" => Some(PrimitiveKind::Double),
            "Edm.DateTime" => Some(PrimitiveKind::DateTime),
            "Edm.Guid" => Some(PrimitiveKind::Guid),
            "Edm.Binary" => Some(PrimitiveKind::Binary),
            _ => None,
        }
    }

    /// The value an absent non-nullable property materializes as.
    ///
    /// Nullable properties default to [`Value::Null`] instead; this is
    /// only consulted when the schema forbids null.
    pub fn default_value(&self) -> Value {
        match self {
            PrimitiveKind::String => Value::Scalar(Scalar::String(String::new())),
            PrimitiveKind::Boolean => Value::Scalar(Scalar::Boolean(false)),
            PrimitiveKind::Int32 => Value::Scalar(Scalar::Int32(0)),
            PrimitiveKind::Int64 => Value::Scalar(Scalar::Int64(0)),
            PrimitiveKind::Double => Value::Scalar(Scalar::Double(0.0)),
            PrimitiveKind::DateTime => {
                Value::Scalar(Scalar::DateTime(chrono::DateTime::UNIX_EPOCH))
            }
            PrimitiveKind::Guid => Value::Scalar(Scalar::Guid(uuid::Uuid::nil())),
            PrimitiveKind::Binary => Value::Scalar(Scalar::Binary(Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_names_round_trip() {
        let kinds = [
            PrimitiveKind::String,
            PrimitiveKind::Boolean,
            PrimitiveKind::Int32,
            PrimitiveKind::Int64,
            PrimitiveKind::Double,
            PrimitiveKind::DateTime,
            PrimitiveKind::Guid,
            PrimitiveKind::Binary,
        ];
        for kind in kinds {
            assert_eq!(
                PrimitiveKind::from_qualified_name(kind.qualified_name()),
                Some(kind)
            );
        }
    }

    #[test]
    fn test_unknown_qualified_name_is_none() {
        assert_eq!(PrimitiveKind::from_qualified_name("Edm.Decimal"), None);
        assert_eq!(PrimitiveKind::from_qualified_name("Int32"), None);
    }

    #[test]
    fn test_defaults_are_zero_valued() {
        assert_eq!(
            PrimitiveKind::Int32.default_value(),
            Value::Scalar(Scalar::Int32(0))
        );
        assert_eq!(
            PrimitiveKind::String.default_value(),
            Value::Scalar(Scalar::String(String::new()))
        );
        assert_eq!(
            PrimitiveKind::Guid.default_value(),
            Value::Scalar(Scalar::Guid(uuid::Uuid::nil()))
        );
    }
}
