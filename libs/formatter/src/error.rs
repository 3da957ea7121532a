//! Formatter failure taxonomy.
//!
//! Three of the four variants come straight from the conversion contract:
//! a `SchemaMismatch` is recoverable (the caller may fall back to a generic
//! representation), while `SerializationFailure` and `QuotaExceeded` are
//! fatal to the current operation and never retried. `InvalidArgument`
//! marks contract violations on converter entry points, signaled
//! immediately rather than deferred.
//!
//! Message wording lives in the constructor helpers below so every call
//! site reports the same contract the same way.

use thiserror::Error;
use wire::WireError;

use crate::payload_kind::PayloadKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatError {
    /// No converter exists for the requested type/kind pairing. Recoverable:
    /// the caller may fall back to a generic representation.
    #[error("The given model does not contain the type '{type_name}'.")]
    SchemaMismatch { type_name: String },

    /// A structural contract was violated. Fatal to the current operation.
    #[error("{reason}")]
    SerializationFailure { reason: String },

    /// A size or depth ceiling was breached. Fatal to the current operation;
    /// the wire-level source states both the limit and the amount consumed.
    #[error("Payload quota exceeded: {source}")]
    QuotaExceeded {
        limit: u64,
        consumed: u64,
        source: WireError,
    },

    /// A converter entry point was handed a value it cannot accept.
    #[error("Invalid value for argument '{parameter}': {reason}")]
    InvalidArgument {
        parameter: &'static str,
        reason: String,
    },
}

impl FormatError {
    pub fn serialization(reason: impl Into<String>) -> Self {
        FormatError::SerializationFailure {
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(parameter: &'static str, reason: impl Into<String>) -> Self {
        FormatError::InvalidArgument {
            parameter,
            reason: reason.into(),
        }
    }

    pub fn type_not_in_model(type_name: impl Into<String>) -> Self {
        FormatError::SchemaMismatch {
            type_name: type_name.into(),
        }
    }

    pub fn null_payload(kind: PayloadKind) -> Self {
        Self::serialization(format!("Cannot serialize a null '{kind}'."))
    }

    pub fn cannot_write_shape(shape: &str, expectation: &str) -> Self {
        Self::serialization(format!(
            "A value of shape '{shape}' cannot be written as {expectation}."
        ))
    }

    pub fn type_mismatch(declared: &str, expected: &str) -> Self {
        Self::serialization(format!(
            "A payload with type name '{declared}' was found, but a payload of type '{expected}' was expected."
        ))
    }

    pub fn unknown_property(property: &str, declaring_type: &str) -> Self {
        Self::serialization(format!(
            "The property '{property}' does not exist on type '{declaring_type}'. Make sure to only use property names that are defined by the type."
        ))
    }

    pub fn non_nullable_property(property: &str, declaring_type: &str) -> Self {
        Self::serialization(format!(
            "The property '{property}' on type '{declaring_type}' is not nullable and cannot carry a null value."
        ))
    }

    pub fn cannot_coerce(found: &str, target: &str) -> Self {
        Self::serialization(format!(
            "A value of '{found}' cannot be converted to the schema kind '{target}'."
        ))
    }

    pub fn missing_path() -> Self {
        Self::serialization(
            "The operation cannot be completed because no resource path is available for the request.",
        )
    }

    pub fn missing_target() -> Self {
        Self::serialization(
            "The request does not resolve to a target schema type. A payload kind cannot be selected without one.",
        )
    }

    pub fn missing_navigation_source() -> Self {
        Self::serialization(
            "The related navigation property could not be found from the request path. The related navigation property is required to deserialize the payload.",
        )
    }

    pub fn base_address_unresolved() -> Self {
        Self::serialization(
            "The formatter was unable to determine the base URI for the request. The request must be processed by a resource route for the formatter to serialize the response.",
        )
    }

    pub fn missing_link(navigation: &str, declaring_type: &str) -> Self {
        Self::serialization(format!(
            "The link generator returned no link for navigation property '{navigation}' on type '{declaring_type}', but the model requires one."
        ))
    }

    pub fn unbound_write() -> Self {
        Self::serialization(
            "The format adapter is not bound to an operation and cannot write a payload. Obtain a request-bound instance through 'per_operation_instance' before writing.",
        )
    }

    pub fn unbound_read() -> Self {
        Self::serialization(
            "The format adapter is not bound to an operation and cannot read a payload. Obtain a request-bound instance through 'per_operation_instance' before reading.",
        )
    }

    pub fn unsupported_error_graph(shape: &str) -> Self {
        Self::serialization(format!(
            "A value of shape '{shape}' is not a supported error graph. Error payloads are produced from an error record or an already structured error."
        ))
    }

    pub fn unsupported_payload_kind(kind: PayloadKind) -> Self {
        Self::serialization(format!(
            "This format adapter does not serve '{kind}' payloads."
        ))
    }

    /// Stable variant label, used in logs and substituted error payloads.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FormatError::SchemaMismatch { .. } => "SchemaMismatch",
            FormatError::SerializationFailure { .. } => "SerializationFailure",
            FormatError::QuotaExceeded { .. } => "QuotaExceeded",
            FormatError::InvalidArgument { .. } => "InvalidArgument",
        }
    }

    /// Whether a write failure of this kind is replaced by a structured
    /// error payload instead of being returned to the host.
    pub fn is_substitutable(&self) -> bool {
        matches!(
            self,
            FormatError::SerializationFailure { .. } | FormatError::QuotaExceeded { .. }
        )
    }
}

impl From<WireError> for FormatError {
    fn from(err: WireError) -> Self {
        match &err {
            WireError::ReceivedBytesExceeded { limit, consumed }
            | WireError::WrittenBytesExceeded { limit, consumed } => FormatError::QuotaExceeded {
                limit: *limit,
                consumed: *consumed,
                source: err,
            },
            WireError::DepthExceeded { limit, depth } => FormatError::QuotaExceeded {
                limit: u64::from(*limit),
                consumed: u64::from(*depth),
                source: err,
            },
            WireError::Malformed { .. } | WireError::UnexpectedShape { .. } => {
                Self::serialization(err.to_string())
            }
        }
    }
}

pub type FormatResult<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_entry_message() {
        let err = FormatError::null_payload(PayloadKind::Entry);
        assert_eq!(err.to_string(), "Cannot serialize a null 'entry'.");
        assert!(err.is_substitutable());
    }

    #[test]
    fn test_quota_conversion_keeps_both_numbers() {
        let err = FormatError::from(WireError::WrittenBytesExceeded {
            limit: 10,
            consumed: 14,
        });
        match &err {
            FormatError::QuotaExceeded { limit, consumed, .. } => {
                assert_eq!((*limit, *consumed), (10, 14));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        let display = err.to_string();
        assert!(display.contains("14 bytes"));
        assert!(display.contains("10 bytes"));
    }

    #[test]
    fn test_malformed_wire_error_becomes_serialization_failure() {
        let err = FormatError::from(WireError::malformed("trailing comma"));
        assert!(matches!(err, FormatError::SerializationFailure { .. }));
        assert!(!matches!(err, FormatError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_schema_mismatch_is_not_substitutable() {
        let err = FormatError::type_not_in_model("Demo.Widget");
        assert_eq!(
            err.to_string(),
            "The given model does not contain the type 'Demo.Widget'."
        );
        assert!(!err.is_substitutable());
    }
}
