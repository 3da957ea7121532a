//! Converter caching and lookup.
//!
//! One provider pair is built per schema and lives as long as the schema
//! does. Type-bound converters are constructed once per type and family,
//! then served from a concurrent cache; stateless kinds are shared
//! singletons. Lookup is a two-step: classify the target into a payload
//! kind, then bind the converter for that kind. Identical lookups on the
//! same provider return the same instance, so hosts may compare or hold
//! converters without cost.

use std::sync::Arc;

use dashmap::DashMap;
use edm::{Model, TypeName, TypeRef};
use tracing::debug;

use crate::de::{
    ComplexDeserializer, Deserializer, EntryDeserializer, FeedDeserializer, PropertyDeserializer,
    RawValueDeserializer, ReferenceLinkCollectionDeserializer, ReferenceLinkDeserializer,
};
use crate::payload_kind::PayloadKind;
use crate::ser::{
    ComplexSerializer, EntrySerializer, ErrorSerializer, FeedSerializer, PropertySerializer,
    RawValueSerializer, ReferenceLinkCollectionSerializer, ReferenceLinkSerializer, Serializer,
    ServiceDocumentSerializer,
};

/// Serves and caches the write-side converters for one schema.
pub struct SerializerProvider {
    model: Arc<Model>,
    entries: DashMap<String, Arc<EntrySerializer>>,
    feeds: DashMap<String, Arc<FeedSerializer>>,
    complexes: DashMap<String, Arc<ComplexSerializer>>,
    properties: DashMap<String, Arc<PropertySerializer>>,
    reference_link: Arc<ReferenceLinkSerializer>,
    reference_links: Arc<ReferenceLinkCollectionSerializer>,
    document: Arc<ServiceDocumentSerializer>,
    error: Arc<ErrorSerializer>,
    raw: Arc<RawValueSerializer>,
}

impl SerializerProvider {
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model,
            entries: DashMap::new(),
            feeds: DashMap::new(),
            complexes: DashMap::new(),
            properties: DashMap::new(),
            reference_link: Arc::new(ReferenceLinkSerializer),
            reference_links: Arc::new(ReferenceLinkCollectionSerializer),
            document: Arc::new(ServiceDocumentSerializer),
            error: Arc::new(ErrorSerializer),
            raw: Arc::new(RawValueSerializer),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Look up the serializer for a target type and payload kind.
    ///
    /// `None` means no converter serves the pairing: the kind needs a
    /// target the request did not resolve, the target has the wrong shape
    /// for the kind, or the named type is not in the model.
    pub fn serializer(
        &self,
        target: Option<&TypeRef>,
        kind: PayloadKind,
    ) -> Option<Arc<dyn Serializer>> {
        match kind {
            PayloadKind::Entry => match target? {
                TypeRef::Entity(name) => {
                    self.entry_serializer(name).map(|s| s as Arc<dyn Serializer>)
                }
                _ => None,
            },
            PayloadKind::Feed => match target?.element()? {
                TypeRef::Entity(name) => {
                    self.feed_serializer(name).map(|s| s as Arc<dyn Serializer>)
                }
                _ => None,
            },
            PayloadKind::Complex => match target? {
                TypeRef::Complex(name) => self
                    .complex_serializer(name)
                    .map(|s| s as Arc<dyn Serializer>),
                _ => None,
            },
            PayloadKind::Property => self
                .property_serializer(target?)
                .map(|s| s as Arc<dyn Serializer>),
            PayloadKind::EntityReferenceLink => {
                Some(Arc::clone(&self.reference_link) as Arc<dyn Serializer>)
            }
            PayloadKind::EntityReferenceLinkCollection => {
                Some(Arc::clone(&self.reference_links) as Arc<dyn Serializer>)
            }
            PayloadKind::ServiceDocument => {
                Some(Arc::clone(&self.document) as Arc<dyn Serializer>)
            }
            PayloadKind::Error => Some(Arc::clone(&self.error) as Arc<dyn Serializer>),
            PayloadKind::RawValue => Some(Arc::clone(&self.raw) as Arc<dyn Serializer>),
        }
    }

    /// Entry serializer bound to the named entity type.
    pub fn entry_serializer(&self, name: &TypeName) -> Option<Arc<EntrySerializer>> {
        let key = name.qualified();
        if let Some(cached) = self.entries.get(&key) {
            return Some(Arc::clone(&cached));
        }
        let entity = Arc::clone(self.model.entity_type(name)?);
        let built = Arc::new(EntrySerializer::new(entity));
        debug!(type_name = %key, family = "entry", "serializer bound");
        let slot = self.entries.entry(key).or_insert(built);
        Some(Arc::clone(&slot))
    }

    /// Feed serializer bound to the named element entity type.
    pub fn feed_serializer(&self, element: &TypeName) -> Option<Arc<FeedSerializer>> {
        let key = element.qualified();
        if let Some(cached) = self.feeds.get(&key) {
            return Some(Arc::clone(&cached));
        }
        let entity = Arc::clone(self.model.entity_type(element)?);
        let built = Arc::new(FeedSerializer::new(entity));
        debug!(type_name = %key, family = "feed", "serializer bound");
        let slot = self.feeds.entry(key).or_insert(built);
        Some(Arc::clone(&slot))
    }

    /// Complex value serializer bound to the named complex type.
    pub fn complex_serializer(&self, name: &TypeName) -> Option<Arc<ComplexSerializer>> {
        let key = name.qualified();
        if let Some(cached) = self.complexes.get(&key) {
            return Some(Arc::clone(&cached));
        }
        let complex = Arc::clone(self.model.complex_type(name)?);
        let built = Arc::new(ComplexSerializer::new(complex));
        debug!(type_name = %key, family = "complex", "serializer bound");
        let slot = self.complexes.entry(key).or_insert(built);
        Some(Arc::clone(&slot))
    }

    /// Property serializer bound to a primitive or collection target.
    pub fn property_serializer(&self, target: &TypeRef) -> Option<Arc<PropertySerializer>> {
        if PayloadKind::for_target(target) != PayloadKind::Property
            || !self.model.resolves(target)
        {
            return None;
        }
        let key = target.qualified_name();
        if let Some(cached) = self.properties.get(&key) {
            return Some(Arc::clone(&cached));
        }
        let built = Arc::new(PropertySerializer::new(target.clone()));
        debug!(type_name = %key, family = "property", "serializer bound");
        let slot = self.properties.entry(key).or_insert(built);
        Some(Arc::clone(&slot))
    }
}

/// Serves and caches the read-side converters for one schema.
pub struct DeserializerProvider {
    model: Arc<Model>,
    entries: DashMap<String, Arc<EntryDeserializer>>,
    feeds: DashMap<String, Arc<FeedDeserializer>>,
    complexes: DashMap<String, Arc<ComplexDeserializer>>,
    properties: DashMap<String, Arc<PropertyDeserializer>>,
    reference_link: ReferenceLinkDeserializer,
    reference_links: ReferenceLinkCollectionDeserializer,
    raw: RawValueDeserializer,
}

impl DeserializerProvider {
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            model,
            entries: DashMap::new(),
            feeds: DashMap::new(),
            complexes: DashMap::new(),
            properties: DashMap::new(),
            reference_link: ReferenceLinkDeserializer,
            reference_links: ReferenceLinkCollectionDeserializer,
            raw: RawValueDeserializer,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Look up the deserializer for a target type and payload kind.
    ///
    /// Only the value-producing kinds resolve here; reference links and
    /// raw values read through the concrete readers below, and service
    /// documents and errors are write-only.
    pub fn deserializer(
        &self,
        target: Option<&TypeRef>,
        kind: PayloadKind,
    ) -> Option<Arc<dyn Deserializer>> {
        match kind {
            PayloadKind::Entry => match target? {
                TypeRef::Entity(name) => self
                    .entry_deserializer(name)
                    .map(|d| d as Arc<dyn Deserializer>),
                _ => None,
            },
            PayloadKind::Feed => match target?.element()? {
                TypeRef::Entity(name) => self
                    .feed_deserializer(name)
                    .map(|d| d as Arc<dyn Deserializer>),
                _ => None,
            },
            PayloadKind::Complex => match target? {
                TypeRef::Complex(name) => self
                    .complex_deserializer(name)
                    .map(|d| d as Arc<dyn Deserializer>),
                _ => None,
            },
            PayloadKind::Property => self
                .property_deserializer(target?)
                .map(|d| d as Arc<dyn Deserializer>),
            _ => None,
        }
    }

    /// Entry deserializer bound to the named entity type.
    pub fn entry_deserializer(&self, name: &TypeName) -> Option<Arc<EntryDeserializer>> {
        let key = name.qualified();
        if let Some(cached) = self.entries.get(&key) {
            return Some(Arc::clone(&cached));
        }
        let entity = Arc::clone(self.model.entity_type(name)?);
        let built = Arc::new(EntryDeserializer::new(entity));
        debug!(type_name = %key, family = "entry", "deserializer bound");
        let slot = self.entries.entry(key).or_insert(built);
        Some(Arc::clone(&slot))
    }

    /// Feed deserializer bound to the named element entity type.
    pub fn feed_deserializer(&self, element: &TypeName) -> Option<Arc<FeedDeserializer>> {
        let key = element.qualified();
        if let Some(cached) = self.feeds.get(&key) {
            return Some(Arc::clone(&cached));
        }
        let entity = Arc::clone(self.model.entity_type(element)?);
        let built = Arc::new(FeedDeserializer::new(entity));
        debug!(type_name = %key, family = "feed", "deserializer bound");
        let slot = self.feeds.entry(key).or_insert(built);
        Some(Arc::clone(&slot))
    }

    /// Complex value deserializer bound to the named complex type.
    pub fn complex_deserializer(&self, name: &TypeName) -> Option<Arc<ComplexDeserializer>> {
        let key = name.qualified();
        if let Some(cached) = self.complexes.get(&key) {
            return Some(Arc::clone(&cached));
        }
        let complex = Arc::clone(self.model.complex_type(name)?);
        let built = Arc::new(ComplexDeserializer::new(complex));
        debug!(type_name = %key, family = "complex", "deserializer bound");
        let slot = self.complexes.entry(key).or_insert(built);
        Some(Arc::clone(&slot))
    }

    /// Property deserializer bound to a primitive or collection target.
    pub fn property_deserializer(&self, target: &TypeRef) -> Option<Arc<PropertyDeserializer>> {
        if PayloadKind::for_target(target) != PayloadKind::Property
            || !self.model.resolves(target)
        {
            return None;
        }
        let key = target.qualified_name();
        if let Some(cached) = self.properties.get(&key) {
            return Some(Arc::clone(&cached));
        }
        let built = Arc::new(PropertyDeserializer::new(target.clone()));
        debug!(type_name = %key, family = "property", "deserializer bound");
        let slot = self.properties.entry(key).or_insert(built);
        Some(Arc::clone(&slot))
    }

    pub fn reference_link_deserializer(&self) -> &ReferenceLinkDeserializer {
        &self.reference_link
    }

    pub fn reference_link_collection_deserializer(&self) -> &ReferenceLinkCollectionDeserializer {
        &self.reference_links
    }

    pub fn raw_value_deserializer(&self) -> &RawValueDeserializer {
        &self.raw
    }
}
