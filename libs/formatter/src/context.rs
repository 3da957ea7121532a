//! Per-operation conversion state.
//!
//! One context is created for each write or read, threaded by shared
//! reference through every converter call, and discarded when the
//! operation ends. Nothing here is pooled or shared across operations;
//! the schema and providers inside are `Arc`s into long-lived state.

use std::sync::Arc;

use edm::Model;
use url::Url;

use crate::links::LinkGenerator;
use crate::metadata_level::MetadataLevel;
use crate::path::ResourcePath;
use crate::provider::{DeserializerProvider, SerializerProvider};
use crate::version::ProtocolVersion;

/// State for one write operation.
pub struct SerializerContext {
    serializers: Arc<SerializerProvider>,
    links: Arc<dyn LinkGenerator>,
    base_address: Url,
    path: Option<ResourcePath>,
    metadata_level: MetadataLevel,
    version: ProtocolVersion,
}

impl SerializerContext {
    pub fn new(
        serializers: Arc<SerializerProvider>,
        links: Arc<dyn LinkGenerator>,
        base_address: Url,
    ) -> Self {
        Self {
            serializers,
            links,
            base_address,
            path: None,
            metadata_level: MetadataLevel::default(),
            version: ProtocolVersion::default(),
        }
    }

    pub fn with_path(mut self, path: ResourcePath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_metadata_level(mut self, level: MetadataLevel) -> Self {
        self.metadata_level = level;
        self
    }

    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    pub fn model(&self) -> &Model {
        self.serializers.model()
    }

    pub fn serializers(&self) -> &SerializerProvider {
        &self.serializers
    }

    pub fn links(&self) -> &dyn LinkGenerator {
        self.links.as_ref()
    }

    pub fn base_address(&self) -> &Url {
        &self.base_address
    }

    pub fn path(&self) -> Option<&ResourcePath> {
        self.path.as_ref()
    }

    pub fn metadata_level(&self) -> MetadataLevel {
        self.metadata_level
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }
}

/// State for one read operation.
pub struct DeserializerContext {
    deserializers: Arc<DeserializerProvider>,
    path: Option<ResourcePath>,
    version: ProtocolVersion,
}

impl DeserializerContext {
    pub fn new(deserializers: Arc<DeserializerProvider>) -> Self {
        Self {
            deserializers,
            path: None,
            version: ProtocolVersion::default(),
        }
    }

    pub fn with_path(mut self, path: ResourcePath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    pub fn model(&self) -> &Model {
        self.deserializers.model()
    }

    pub fn deserializers(&self) -> &DeserializerProvider {
        &self.deserializers
    }

    pub fn path(&self) -> Option<&ResourcePath> {
        self.path.as_ref()
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }
}
