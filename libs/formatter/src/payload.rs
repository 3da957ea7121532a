//! The closed set of graphs the write path accepts.

use edm::Value;
use url::Url;
use wire::{ServiceDocument, StructuredError};

use crate::error_record::ErrorRecord;

/// One writable graph, tagged by what it is.
///
/// Domain data travels as [`Payload::Value`] and gets its payload kind
/// from the target type and resource path; the remaining variants name
/// their kind directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A domain value: entry, feed, property, complex, or raw value.
    Value(Value),

    /// A single relationship target.
    Ref(Url),

    /// A collection of relationship targets.
    Refs(Vec<Url>),

    /// The service document.
    ServiceDocument(ServiceDocument),

    /// A host failure record, translated before writing.
    Error(ErrorRecord),

    /// An already normalized error.
    StructuredError(StructuredError),
}

impl Payload {
    /// Short shape word for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Payload::Value(value) => value.shape(),
            Payload::Ref(_) => "reference link",
            Payload::Refs(_) => "reference link collection",
            Payload::ServiceDocument(_) => "service document",
            Payload::Error(_) => "error record",
            Payload::StructuredError(_) => "structured error",
        }
    }

    pub fn is_null_value(&self) -> bool {
        matches!(self, Payload::Value(Value::Null))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Value(value)
    }
}

impl From<Url> for Payload {
    fn from(target: Url) -> Self {
        Payload::Ref(target)
    }
}

impl From<ErrorRecord> for Payload {
    fn from(record: ErrorRecord) -> Self {
        Payload::Error(record)
    }
}
