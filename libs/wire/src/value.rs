//! Structured wire values.
//!
//! These are the records the grammar reads and writes. Scalars carry only
//! the shapes JSON itself distinguishes; richer kinds (timestamps, GUIDs,
//! binary) travel as lexical strings and are coerced by the conversion
//! layer against the schema, not guessed at here.

use url::Url;

/// Annotation keys of the grammar. Data property names never start with
/// `@`, so these cannot collide with schema properties.
pub(crate) mod keys {
    pub const TYPE: &str = "@type";
    pub const ID: &str = "@id";
    pub const EDIT_LINK: &str = "@editLink";
    pub const LINK_SUFFIX: &str = "@link";
    pub const VALUE: &str = "value";
    pub const URL: &str = "url";
    pub const COLLECTIONS: &str = "collections";
    pub const ERROR: &str = "error";
}

/// A scalar as JSON carries it.
#[derive(Debug, Clone, PartialEq)]
pub enum WireScalar {
    String(String),
    Bool(bool),
    Int64(i64),
    Double(f64),
}

impl WireScalar {
    /// Lexical form used for raw-value payloads.
    pub fn to_text(&self) -> String {
        match self {
            WireScalar::String(s) => s.clone(),
            WireScalar::Bool(b) => b.to_string(),
            WireScalar::Int64(i) => i.to_string(),
            WireScalar::Double(d) => d.to_string(),
        }
    }

    /// Short shape word for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            WireScalar::String(_) => "string",
            WireScalar::Bool(_) => "boolean",
            WireScalar::Int64(_) => "integer",
            WireScalar::Double(_) => "double",
        }
    }
}

/// Any value position in a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Null,
    Scalar(WireScalar),
    Structured(WireRecord),
    Collection(Vec<WireValue>),
}

impl WireValue {
    pub fn as_structured(&self) -> Option<&WireRecord> {
        match self {
            WireValue::Structured(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&WireScalar> {
        match self {
            WireValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            WireValue::Null => "null",
            WireValue::Scalar(s) => s.shape(),
            WireValue::Structured(_) => "structured value",
            WireValue::Collection(_) => "collection",
        }
    }
}

/// A named property inside a structured value.
#[derive(Debug, Clone, PartialEq)]
pub struct WireProperty {
    pub name: String,
    pub value: WireValue,
}

/// A navigation link attached to an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct WireLink {
    pub name: String,
    pub target: Url,
}

/// A structured value: ordered properties plus the annotation slots an
/// entry payload may carry. Non-entry structured values (complex values)
/// simply leave the link slots empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireRecord {
    pub type_name: Option<String>,
    pub id: Option<Url>,
    pub edit_link: Option<Url>,
    pub links: Vec<WireLink>,
    properties: Vec<WireProperty>,
}

impl WireRecord {
    pub fn new(type_name: Option<String>) -> Self {
        Self {
            type_name,
            ..Default::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: WireValue) -> Self {
        self.push_property(name, value);
        self
    }

    /// Append a property. Order of appends is the order on the wire.
    pub fn push_property(&mut self, name: impl Into<String>, value: WireValue) {
        self.properties.push(WireProperty {
            name: name.into(),
            value,
        });
    }

    pub fn push_link(&mut self, name: impl Into<String>, target: Url) {
        self.links.push(WireLink {
            name: name.into(),
            target,
        });
    }

    pub fn property(&self, name: &str) -> Option<&WireValue> {
        self.properties
            .iter()
            .find_map(|p| (p.name == name).then_some(&p.value))
    }

    pub fn properties(&self) -> &[WireProperty] {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_property_order_is_append_order() {
        let record = WireRecord::new(Some("Demo.Person".to_string()))
            .with_property("PerId", WireValue::Scalar(WireScalar::Int64(7)))
            .with_property("Name", WireValue::Scalar(WireScalar::String("Ada".into())));
        let names: Vec<&str> = record.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["PerId", "Name"]);
        assert!(record.property("Name").is_some());
        assert!(record.property("Missing").is_none());
    }

    #[test]
    fn test_raw_text_forms() {
        assert_eq!(WireScalar::Int64(42).to_text(), "42");
        assert_eq!(WireScalar::Bool(true).to_text(), "true");
        assert_eq!(WireScalar::String("Redmond".into()).to_text(), "Redmond");
    }
}
