//! The closed runtime value model.
//!
//! Everything the conversion layer is handed arrives as a [`Value`]: a
//! scalar, a structured record, a collection, or null. There is no open
//! "any object" escape hatch - hosts build values explicitly, and the
//! converters match on this closed set.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::name::TypeName;
use crate::primitive::PrimitiveKind;

/// A scalar domain value. One variant per [`PrimitiveKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    DateTime(DateTime<Utc>),
    Guid(Uuid),
    Binary(Vec<u8>),
}

impl Scalar {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Scalar::String(_) => PrimitiveKind::String,
            Scalar::Boolean(_) => PrimitiveKind::Boolean,
            Scalar::Int32(_) => PrimitiveKind::Int32,
            Scalar::Int64(_) => PrimitiveKind::Int64,
            Scalar::Double(_) => PrimitiveKind::Double,
            Scalar::DateTime(_) => PrimitiveKind::DateTime,
            Scalar::Guid(_) => PrimitiveKind::Guid,
            Scalar::Binary(_) => PrimitiveKind::Binary,
        }
    }
}

/// A structured value: ordered named fields, optionally carrying the
/// qualified name of the schema type it claims to be an instance of.
///
/// Field order is insertion order and survives conversion, so payloads
/// built from the same record are byte-stable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    type_name: Option<TypeName>,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name: Some(type_name),
            fields: Vec::new(),
        }
    }

    /// A record that leaves its type to be inferred from context.
    pub fn untyped() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field, replacing an earlier field of the same name in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn type_name(&self) -> Option<&TypeName> {
        self.type_name.as_ref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Any domain value the conversion layer accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Scalar(Scalar),
    Record(Record),
    Collection(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&[Value]> {
        match self {
            Value::Collection(items) => Some(items),
            _ => None,
        }
    }

    /// Short shape word for diagnostics: "null", "scalar", "record",
    /// "collection".
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Scalar(_) => "scalar",
            Value::Record(_) => "record",
            Value::Collection(_) => "collection",
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Collection(items)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Boolean(b))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Int32(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int64(i))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Scalar(Scalar::Double(d))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Scalar(Scalar::DateTime(t))
    }
}

impl From<Uuid> for Value {
    fn from(g: Uuid) -> Self {
        Value::Scalar(Scalar::Guid(g))
    }
}
