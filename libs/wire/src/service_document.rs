//! Service document payloads.

/// One addressable collection advertised by a service document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCollection {
    pub name: String,
    pub href: String,
}

impl ResourceCollection {
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
        }
    }
}

/// The service document: the ordered list of collections a service
/// exposes at its root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceDocument {
    collections: Vec<ResourceCollection>,
}

impl ServiceDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, collection: ResourceCollection) {
        self.collections.push(collection);
    }

    pub fn with(mut self, name: impl Into<String>, href: impl Into<String>) -> Self {
        self.add(ResourceCollection::new(name, href));
        self
    }

    pub fn collections(&self) -> &[ResourceCollection] {
        &self.collections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_keep_declaration_order() {
        let doc = ServiceDocument::new()
            .with("People", "People")
            .with("Orders", "Orders");
        let names: Vec<&str> = doc.collections().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["People", "Orders"]);
    }
}
