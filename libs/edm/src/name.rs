//! Qualified schema type names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A namespace-qualified schema type name, rendered `Namespace.Name`.
///
/// Names are the identity of schema types: two types are the same type
/// exactly when their qualified names are equal. Comparison is
/// case-sensitive, matching the wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeName {
    namespace: String,
    name: String,
}

impl TypeName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Split a qualified name at its last dot. A name without a dot is
    /// treated as living in the empty namespace.
    pub fn parse(qualified: &str) -> Self {
        match qualified.rsplit_once('.') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::new("", qualified),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The local (unqualified) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}
