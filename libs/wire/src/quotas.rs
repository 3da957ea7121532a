//! Payload size and structure ceilings.

use serde::{Deserialize, Serialize};

/// Quotas enforced by [`MessageWriter`](crate::MessageWriter) and
/// [`MessageReader`](crate::MessageReader).
///
/// Depth counts every structured-value or collection frame in the payload
/// tree, starting at 1 for the outermost frame. The byte ceiling applies
/// to the complete payload buffer in either direction. Defaults are
/// permissive: depth 100 and an effectively unbounded byte ceiling; hosts
/// that face untrusted peers configure tighter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageQuotas {
    pub max_nesting_depth: u32,
    pub max_message_bytes: u64,
}

impl Default for MessageQuotas {
    fn default() -> Self {
        Self {
            max_nesting_depth: 100,
            max_message_bytes: i64::MAX as u64,
        }
    }
}

impl MessageQuotas {
    /// Tight limits for internet-facing deployments.
    pub fn production() -> Self {
        Self {
            max_nesting_depth: 64,
            max_message_bytes: 16 * 1024 * 1024,
        }
    }

    /// Permissive limits for local development.
    pub fn development() -> Self {
        Self::default()
    }

    pub fn with_max_nesting_depth(mut self, depth: u32) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_max_message_bytes(mut self, bytes: u64) -> Self {
        self.max_message_bytes = bytes;
        self
    }
}
