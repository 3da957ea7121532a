//! Wire-level failures.

use thiserror::Error;

/// Failures raised by the wire grammar itself.
///
/// Quota variants carry both the configured limit and the amount consumed
/// so callers can report the breach without re-measuring anything.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("The maximum number of bytes allowed to be read from the stream has been exceeded. After the last read operation, a total of {consumed} bytes has been read from the stream; however a maximum of {limit} bytes is allowed.")]
    ReceivedBytesExceeded { limit: u64, consumed: u64 },

    #[error("The maximum number of bytes allowed to be written to the stream has been exceeded. A total of {consumed} bytes has been written to the stream; however a maximum of {limit} bytes is allowed.")]
    WrittenBytesExceeded { limit: u64, consumed: u64 },

    #[error("The maximum nesting depth for the payload has been exceeded. The payload reaches a depth of {depth}; however a maximum depth of {limit} is allowed.")]
    DepthExceeded { limit: u32, depth: u32 },

    #[error("The payload is not well formed: {detail}")]
    Malformed { detail: String },

    #[error("Unexpected payload shape: expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: String,
    },
}

impl WireError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        WireError::Malformed {
            detail: detail.into(),
        }
    }

    pub fn unexpected_shape(expected: &'static str, found: impl Into<String>) -> Self {
        WireError::UnexpectedShape {
            expected,
            found: found.into(),
        }
    }

    /// Whether this failure is a size or depth quota breach.
    pub fn is_quota_breach(&self) -> bool {
        matches!(
            self,
            WireError::ReceivedBytesExceeded { .. }
                | WireError::WrittenBytesExceeded { .. }
                | WireError::DepthExceeded { .. }
        )
    }
}

impl From<serde_json::Error> for WireError {
    fn from(err: serde_json::Error) -> Self {
        WireError::Malformed {
            detail: err.to_string(),
        }
    }
}

pub type WireResult<T> = std::result::Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_received_quota_message_states_both_numbers() {
        let err = WireError::ReceivedBytesExceeded {
            limit: 1,
            consumed: 19,
        };
        assert_eq!(
            err.to_string(),
            "The maximum number of bytes allowed to be read from the stream has been exceeded. \
             After the last read operation, a total of 19 bytes has been read from the stream; \
             however a maximum of 1 bytes is allowed."
        );
        assert!(err.is_quota_breach());
    }

    #[test]
    fn test_malformed_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = WireError::from(parse_err);
        assert!(matches!(err, WireError::Malformed { .. }));
        assert!(!err.is_quota_breach());
    }
}
