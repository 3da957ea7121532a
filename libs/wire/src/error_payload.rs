//! The structured error payload shape.
//!
//! This is the protocol-stable error representation written to clients.
//! The translation from host failure records into this shape lives in the
//! `formatter` crate; the grammar here only defines and writes it.

/// Top-level error payload: a public message plus optional debug chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredError {
    pub message: Option<String>,
    pub message_language: Option<String>,
    pub error_code: Option<String>,
    pub inner: Option<InnerError>,
}

impl StructuredError {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// One node of the debug detail chain: message, originating type name,
/// stack trace, and optionally the cause beneath it. Each node exclusively
/// owns its nested node, so the chain is finite and singly linked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InnerError {
    pub message: Option<String>,
    pub type_name: Option<String>,
    pub stack_trace: Option<String>,
    pub inner: Option<Box<InnerError>>,
}

impl InnerError {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Number of nodes in this chain, counting self.
    pub fn depth(&self) -> usize {
        1 + self.inner.as_deref().map_or(0, InnerError::depth)
    }
}
