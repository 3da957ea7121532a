//! Primitive coercion between domain scalars and wire scalars.
//!
//! The wire grammar carries four scalar shapes; the schema declares eight
//! primitive kinds. Writing maps a domain scalar to its wire shape and
//! demands the scalar's kind equal the declared kind, no silent widening.
//! Reading coerces the wire shape back under the schema's declared kind:
//! lexical strings become dates, GUIDs, and binary; integers narrow with a
//! range check. Anything outside the table is a serialization failure
//! naming both sides.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use edm::{PrimitiveKind, Scalar};
use uuid::Uuid;
use wire::WireScalar;

use crate::error::{FormatError, FormatResult};

/// Write-side mapping, strict on the declared kind.
pub(crate) fn scalar_to_wire(scalar: &Scalar, declared: PrimitiveKind) -> FormatResult<WireScalar> {
    if scalar.kind() != declared {
        return Err(FormatError::cannot_coerce(
            scalar.kind().qualified_name(),
            declared.qualified_name(),
        ));
    }
    Ok(wire_form(scalar))
}

/// The wire shape of one domain scalar.
pub(crate) fn wire_form(scalar: &Scalar) -> WireScalar {
    match scalar {
        Scalar::String(s) => WireScalar::String(s.clone()),
        Scalar::Boolean(b) => WireScalar::Bool(*b),
        Scalar::Int32(i) => WireScalar::Int64(i64::from(*i)),
        Scalar::Int64(i) => WireScalar::Int64(*i),
        Scalar::Double(d) => WireScalar::Double(*d),
        Scalar::DateTime(ts) => WireScalar::String(ts.to_rfc3339()),
        Scalar::Guid(id) => WireScalar::String(id.to_string()),
        Scalar::Binary(bytes) => WireScalar::String(BASE64.encode(bytes)),
    }
}

/// Read-side coercion under the schema's declared kind.
pub(crate) fn scalar_from_wire(
    wire: &WireScalar,
    declared: PrimitiveKind,
) -> FormatResult<Scalar> {
    let mismatch = || FormatError::cannot_coerce(wire.shape(), declared.qualified_name());
    match (wire, declared) {
        (WireScalar::String(s), PrimitiveKind::String) => Ok(Scalar::String(s.clone())),
        (WireScalar::String(s), PrimitiveKind::DateTime) => parse_datetime(s),
        (WireScalar::String(s), PrimitiveKind::Guid) => parse_guid(s),
        (WireScalar::String(s), PrimitiveKind::Binary) => parse_binary(s),
        (WireScalar::Bool(b), PrimitiveKind::Boolean) => Ok(Scalar::Boolean(*b)),
        (WireScalar::Int64(i), PrimitiveKind::Int32) => i32::try_from(*i)
            .map(Scalar::Int32)
            .map_err(|_| mismatch()),
        (WireScalar::Int64(i), PrimitiveKind::Int64) => Ok(Scalar::Int64(*i)),
        (WireScalar::Int64(i), PrimitiveKind::Double) => Ok(Scalar::Double(*i as f64)),
        (WireScalar::Double(d), PrimitiveKind::Double) => Ok(Scalar::Double(*d)),
        _ => Err(mismatch()),
    }
}

/// Parse the lexical text of a raw-value payload under a declared kind.
pub(crate) fn parse_raw_value(text: &str, declared: PrimitiveKind) -> FormatResult<Scalar> {
    let unparseable = || {
        FormatError::cannot_coerce(
            &format!("the raw text '{text}'"),
            declared.qualified_name(),
        )
    };
    match declared {
        PrimitiveKind::String => Ok(Scalar::String(text.to_string())),
        PrimitiveKind::Boolean => match text.trim() {
            "true" => Ok(Scalar::Boolean(true)),
            "false" => Ok(Scalar::Boolean(false)),
            _ => Err(unparseable()),
        },
        PrimitiveKind::Int32 => text.trim().parse().map(Scalar::Int32).map_err(|_| unparseable()),
        PrimitiveKind::Int64 => text.trim().parse().map(Scalar::Int64).map_err(|_| unparseable()),
        PrimitiveKind::Double => text.trim().parse().map(Scalar::Double).map_err(|_| unparseable()),
        PrimitiveKind::DateTime => parse_datetime(text.trim()),
        PrimitiveKind::Guid => parse_guid(text.trim()),
        PrimitiveKind::Binary => parse_binary(text.trim()),
    }
}

fn parse_datetime(text: &str) -> FormatResult<Scalar> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| Scalar::DateTime(ts.with_timezone(&Utc)))
        .map_err(|e| {
            FormatError::cannot_coerce(
                &format!("the text '{text}' ({e})"),
                PrimitiveKind::DateTime.qualified_name(),
            )
        })
}

fn parse_guid(text: &str) -> FormatResult<Scalar> {
    Uuid::parse_str(text).map(Scalar::Guid).map_err(|_| {
        FormatError::cannot_coerce(
            &format!("the text '{text}'"),
            PrimitiveKind::Guid.qualified_name(),
        )
    })
}

fn parse_binary(text: &str) -> FormatResult<Scalar> {
    BASE64.decode(text).map(Scalar::Binary).map_err(|_| {
        FormatError::cannot_coerce(
            &format!("the text '{text}'"),
            PrimitiveKind::Binary.qualified_name(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_write_side_requires_exact_kind() {
        let err = scalar_to_wire(&Scalar::Int64(5), PrimitiveKind::Int32).unwrap_err();
        assert!(err.to_string().contains("Edm.Int64"));
        assert!(err.to_string().contains("Edm.Int32"));

        assert_eq!(
            scalar_to_wire(&Scalar::Int32(5), PrimitiveKind::Int32).unwrap(),
            WireScalar::Int64(5)
        );
    }

    #[test]
    fn test_lexical_kinds_round_trip() {
        let ts = Utc.with_ymd_and_hms(2013, 4, 1, 16, 30, 0).unwrap();
        let wire = wire_form(&Scalar::DateTime(ts));
        assert_eq!(
            scalar_from_wire(&wire, PrimitiveKind::DateTime).unwrap(),
            Scalar::DateTime(ts)
        );

        let id = Uuid::parse_str("0e01ff1e-8f90-49b2-a30c-8a8d12bd305a").unwrap();
        let wire = wire_form(&Scalar::Guid(id));
        assert_eq!(
            scalar_from_wire(&wire, PrimitiveKind::Guid).unwrap(),
            Scalar::Guid(id)
        );

        let wire = wire_form(&Scalar::Binary(vec![1, 2, 3]));
        assert_eq!(wire, WireScalar::String("AQID".to_string()));
        assert_eq!(
            scalar_from_wire(&wire, PrimitiveKind::Binary).unwrap(),
            Scalar::Binary(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_integer_narrowing_is_range_checked() {
        assert_eq!(
            scalar_from_wire(&WireScalar::Int64(7), PrimitiveKind::Int32).unwrap(),
            Scalar::Int32(7)
        );
        assert!(
            scalar_from_wire(&WireScalar::Int64(i64::MAX), PrimitiveKind::Int32).is_err()
        );
        assert_eq!(
            scalar_from_wire(&WireScalar::Int64(2), PrimitiveKind::Double).unwrap(),
            Scalar::Double(2.0)
        );
    }

    #[test]
    fn test_shape_mismatches_fail() {
        assert!(scalar_from_wire(&WireScalar::Bool(true), PrimitiveKind::String).is_err());
        assert!(
            scalar_from_wire(&WireScalar::String("x".into()), PrimitiveKind::Int32).is_err()
        );
    }

    #[test]
    fn test_raw_value_parsing() {
        assert_eq!(
            parse_raw_value("29", PrimitiveKind::Int32).unwrap(),
            Scalar::Int32(29)
        );
        assert_eq!(
            parse_raw_value("true", PrimitiveKind::Boolean).unwrap(),
            Scalar::Boolean(true)
        );
        assert_eq!(
            parse_raw_value("Redmond", PrimitiveKind::String).unwrap(),
            Scalar::String("Redmond".to_string())
        );
        assert!(parse_raw_value("almost", PrimitiveKind::Boolean).is_err());
    }
}
