//! The host-facing format adapter.
//!
//! A [`FormatAdapter`] is built once per schema as a template, then bound
//! to each request with [`per_operation_instance`]. The bound instance
//! carries the negotiated protocol version and everything else the
//! converters need for exactly one write or read; the converter caches
//! live in the shared providers and survive across operations.
//!
//! The write path substitutes: when a conversion fails mid-flight with a
//! fatal failure, the output is replaced by a structured error payload
//! and the failure is reported through the outcome instead of an `Err`.
//! Precondition failures (an unbound adapter, a kind the adapter does not
//! serve, a null graph with no representation, an unresolvable base
//! address) are returned to the host directly. The read path never
//! substitutes.
//!
//! [`per_operation_instance`]: FormatAdapter::per_operation_instance

use std::sync::Arc;

use edm::{Model, TypeRef, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use url::{Position, Url};
use wire::{MessageQuotas, MessageReader, MessageWriter, ServiceDocument};

use crate::context::{DeserializerContext, SerializerContext};
use crate::error::{FormatError, FormatResult};
use crate::error_record::ErrorRecord;
use crate::error_translation::to_structured_error;
use crate::links::{LinkGenerator, NoOpLinkGenerator};
use crate::media_type::MediaType;
use crate::metadata_level::MetadataLevel;
use crate::path::{PathSegment, ResourcePath};
use crate::payload::Payload;
use crate::payload_kind::PayloadKind;
use crate::provider::{DeserializerProvider, SerializerProvider};
use crate::ser::service_document;
use crate::version::ProtocolVersion;

/// Public face of a substituted error payload. Deliberately generic; the
/// actual failure is logged, and carried as debug detail only when the
/// configuration says so.
const SUBSTITUTED_ERROR_MESSAGE: &str =
    "An error has occurred while writing the response payload.";

/// Behavior switches for a format adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Quotas applied to written payloads.
    pub writer_quotas: MessageQuotas,
    /// Quotas applied to received payloads.
    pub reader_quotas: MessageQuotas,
    /// Whether substituted error payloads carry the failure message and
    /// kind as debug detail.
    pub include_error_detail: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl FormatterConfig {
    /// Profile for untrusted peers: default quotas, no failure internals
    /// in substituted error payloads.
    pub fn production() -> Self {
        Self {
            writer_quotas: MessageQuotas::default(),
            reader_quotas: MessageQuotas::default(),
            include_error_detail: false,
        }
    }

    /// Profile for development: substituted error payloads carry the
    /// failure message and kind.
    pub fn development() -> Self {
        Self {
            include_error_detail: true,
            ..Self::production()
        }
    }
}

/// Everything the adapter learns from one host request.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    request_address: Url,
    path: Option<ResourcePath>,
    target: Option<TypeRef>,
    route_prefix: Option<String>,
    content_type: Option<MediaType>,
    version: Option<ProtocolVersion>,
    max_version: Option<ProtocolVersion>,
}

impl OperationRequest {
    pub fn new(request_address: Url) -> Self {
        Self {
            request_address,
            path: None,
            target: None,
            route_prefix: None,
            content_type: None,
            version: None,
            max_version: None,
        }
    }

    /// The routed resource path.
    pub fn with_path(mut self, path: ResourcePath) -> Self {
        self.path = Some(path);
        self
    }

    /// The schema type the path resolves to.
    pub fn with_target(mut self, target: TypeRef) -> Self {
        self.target = Some(target);
        self
    }

    /// The route prefix the request was matched under, used to resolve
    /// the base address payload links are written against.
    pub fn with_route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = Some(prefix.into());
        self
    }

    /// The negotiated content type of the payload.
    pub fn with_content_type(mut self, content_type: MediaType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// The protocol version the peer declared for its payload.
    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// The highest protocol version the peer accepts.
    pub fn with_max_version(mut self, version: ProtocolVersion) -> Self {
        self.max_version = Some(version);
        self
    }
}

/// What a write call produced.
#[derive(Debug)]
pub enum WriteOutcome {
    /// The requested payload was written.
    Written { bytes: Vec<u8> },

    /// The conversion failed mid-flight; a structured error payload was
    /// written in its place and the failure is reported here.
    ErrorSubstituted { bytes: Vec<u8>, failure: FormatError },
}

impl WriteOutcome {
    pub fn bytes(&self) -> &[u8] {
        match self {
            WriteOutcome::Written { bytes } | WriteOutcome::ErrorSubstituted { bytes, .. } => {
                bytes
            }
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            WriteOutcome::Written { bytes } | WriteOutcome::ErrorSubstituted { bytes, .. } => {
                bytes
            }
        }
    }

    /// The failure a substituted payload replaced, if any.
    pub fn substituted_failure(&self) -> Option<&FormatError> {
        match self {
            WriteOutcome::Written { .. } => None,
            WriteOutcome::ErrorSubstituted { failure, .. } => Some(failure),
        }
    }
}

/// Per-schema conversion front end.
pub struct FormatAdapter {
    serializers: Arc<SerializerProvider>,
    deserializers: Arc<DeserializerProvider>,
    links: Arc<dyn LinkGenerator>,
    payload_kinds: Vec<PayloadKind>,
    config: FormatterConfig,
    request: Option<OperationRequest>,
    version: ProtocolVersion,
}

impl FormatAdapter {
    /// Template constructor: an adapter serving the given payload kinds
    /// over the given schema, not yet bound to any request.
    pub fn new(model: Arc<Model>, payload_kinds: Vec<PayloadKind>, config: FormatterConfig) -> Self {
        Self {
            serializers: Arc::new(SerializerProvider::new(Arc::clone(&model))),
            deserializers: Arc::new(DeserializerProvider::new(model)),
            links: Arc::new(NoOpLinkGenerator),
            payload_kinds,
            config,
            request: None,
            version: ProtocolVersion::default(),
        }
    }

    /// Template serving every payload kind.
    pub fn for_all_kinds(model: Arc<Model>, config: FormatterConfig) -> Self {
        Self::new(model, PayloadKind::ALL.to_vec(), config)
    }

    /// Replace the link generator written entries consult.
    pub fn with_link_generator(mut self, links: Arc<dyn LinkGenerator>) -> Self {
        self.links = links;
        self
    }

    /// Bind a request-scoped instance.
    ///
    /// The instance shares this template's providers, and with them every
    /// converter cached so far; the request's protocol version is
    /// negotiated here, once.
    pub fn per_operation_instance(&self, request: OperationRequest) -> Self {
        let version = ProtocolVersion::negotiate(request.version, request.max_version);
        debug!(version = version.as_header_value(), "format adapter bound to operation");
        Self {
            serializers: Arc::clone(&self.serializers),
            deserializers: Arc::clone(&self.deserializers),
            links: Arc::clone(&self.links),
            payload_kinds: self.payload_kinds.clone(),
            config: self.config,
            request: Some(request),
            version,
        }
    }

    pub fn model(&self) -> &Model {
        self.serializers.model()
    }

    /// The protocol version response headers should declare.
    pub fn response_version(&self) -> ProtocolVersion {
        self.version
    }

    /// The content type response headers should declare.
    pub fn response_content_type(&self) -> MediaType {
        self.request
            .as_ref()
            .and_then(|request| request.content_type.clone())
            .unwrap_or_else(MediaType::application_json)
    }

    /// The service document for the bound schema.
    pub fn service_document(&self) -> ServiceDocument {
        service_document(self.serializers.model())
    }

    /// Select the payload kind the bound request addresses.
    pub fn select_payload_kind(&self) -> FormatResult<PayloadKind> {
        let request = self.request.as_ref().ok_or_else(FormatError::unbound_write)?;
        self.kind_for(request)
    }

    fn kind_for(&self, request: &OperationRequest) -> FormatResult<PayloadKind> {
        let target = request.target.as_ref();
        let Some(path) = request.path.as_ref().filter(|path| !path.is_empty()) else {
            return if target.is_none() {
                Ok(PayloadKind::ServiceDocument)
            } else {
                Err(FormatError::missing_path())
            };
        };
        match path.terminal() {
            Some(PathSegment::RawValue) => Ok(PayloadKind::RawValue),
            Some(PathSegment::Links) => Err(FormatError::missing_navigation_source()),
            Some(PathSegment::Navigation(_)) if path.is_links_navigation() => {
                let navigation = path
                    .links_navigation(self.serializers.model())
                    .ok_or_else(FormatError::missing_navigation_source)?;
                Ok(if navigation.is_collection {
                    PayloadKind::EntityReferenceLinkCollection
                } else {
                    PayloadKind::EntityReferenceLink
                })
            }
            _ => {
                let target = target.ok_or_else(FormatError::missing_target)?;
                Ok(PayloadKind::for_target(target))
            }
        }
    }

    /// Write one payload for the bound request.
    ///
    /// Self-describing payloads (errors, reference links, the service
    /// document) carry their kind in their tag; domain values take theirs
    /// from the request path and target.
    pub fn write(&self, payload: &Payload) -> FormatResult<WriteOutcome> {
        let request = self.request.as_ref().ok_or_else(FormatError::unbound_write)?;
        let kind = match payload {
            Payload::Error(_) | Payload::StructuredError(_) => PayloadKind::Error,
            Payload::ServiceDocument(_) => PayloadKind::ServiceDocument,
            Payload::Ref(_) => PayloadKind::EntityReferenceLink,
            Payload::Refs(_) => PayloadKind::EntityReferenceLinkCollection,
            Payload::Value(_) => self.kind_for(request)?,
        };
        if !self.payload_kinds.contains(&kind) {
            return Err(FormatError::unsupported_payload_kind(kind));
        }
        if payload.is_null_value() && !kind.supports_null_graph() {
            return Err(FormatError::null_payload(kind));
        }
        let serializer = self
            .serializers
            .serializer(request.target.as_ref(), kind)
            .ok_or_else(|| Self::no_converter(request))?;

        let ctx = self.serializer_context(request)?;
        let mut writer = MessageWriter::new(self.config.writer_quotas);
        match serializer.write(payload, &mut writer, &ctx) {
            Ok(()) => Ok(WriteOutcome::Written {
                bytes: writer.into_bytes(),
            }),
            Err(failure) if failure.is_substitutable() => {
                warn!(
                    error = %failure,
                    kind = failure.kind_name(),
                    "write failed; substituting error payload"
                );
                self.substitute_error(failure)
            }
            Err(failure) => {
                error!(error = %failure, kind = failure.kind_name(), "write failed");
                Err(failure)
            }
        }
    }

    /// Read one domain-value payload for the bound request. The read path
    /// never substitutes: any failure is returned as-is.
    pub fn read_value(&self, payload: &[u8]) -> FormatResult<Value> {
        let request = self.request.as_ref().ok_or_else(FormatError::unbound_read)?;
        let kind = self.kind_for(request)?;
        if !self.payload_kinds.contains(&kind) {
            return Err(FormatError::unsupported_payload_kind(kind));
        }
        let deserializer = match self.deserializers.deserializer(request.target.as_ref(), kind) {
            Some(deserializer) => deserializer,
            None if matches!(
                kind,
                PayloadKind::Entry | PayloadKind::Feed | PayloadKind::Property | PayloadKind::Complex
            ) =>
            {
                return Err(Self::no_converter(request))
            }
            None => {
                return Err(FormatError::serialization(format!(
                    "A '{kind}' payload is not read as a domain value. Use the dedicated read entry point for this kind."
                )))
            }
        };
        let reader = MessageReader::new(payload, self.config.reader_quotas)?;
        let ctx = self.deserializer_context(request);
        deserializer.read(&reader, &ctx)
    }

    /// Read one relationship payload for the bound request.
    pub fn read_reference_link(&self, payload: &[u8]) -> FormatResult<Url> {
        let request = self.request.as_ref().ok_or_else(FormatError::unbound_read)?;
        if !self.payload_kinds.contains(&PayloadKind::EntityReferenceLink) {
            return Err(FormatError::unsupported_payload_kind(
                PayloadKind::EntityReferenceLink,
            ));
        }
        let reader = MessageReader::new(payload, self.config.reader_quotas)?;
        let ctx = self.deserializer_context(request);
        self.deserializers
            .reference_link_deserializer()
            .read(&reader, &ctx)
    }

    /// Read a collection of relationship payloads for the bound request.
    pub fn read_reference_links(&self, payload: &[u8]) -> FormatResult<Vec<Url>> {
        let request = self.request.as_ref().ok_or_else(FormatError::unbound_read)?;
        if !self.payload_kinds.contains(&PayloadKind::EntityReferenceLinkCollection) {
            return Err(FormatError::unsupported_payload_kind(
                PayloadKind::EntityReferenceLinkCollection,
            ));
        }
        let reader = MessageReader::new(payload, self.config.reader_quotas)?;
        let ctx = self.deserializer_context(request);
        self.deserializers
            .reference_link_collection_deserializer()
            .read(&reader, &ctx)
    }

    /// Read one bare-value payload under the primitive kind the request's
    /// target resolves to.
    pub fn read_raw_value(&self, payload: &[u8]) -> FormatResult<Value> {
        let request = self.request.as_ref().ok_or_else(FormatError::unbound_read)?;
        if !self.payload_kinds.contains(&PayloadKind::RawValue) {
            return Err(FormatError::unsupported_payload_kind(PayloadKind::RawValue));
        }
        let declared = request
            .target
            .as_ref()
            .and_then(TypeRef::primitive_kind)
            .ok_or_else(FormatError::missing_target)?;
        let reader = MessageReader::new(payload, self.config.reader_quotas)?;
        self.deserializers
            .raw_value_deserializer()
            .read(&reader, declared)
    }

    fn serializer_context(&self, request: &OperationRequest) -> FormatResult<SerializerContext> {
        let base_address = Self::resolve_base_address(request)?;
        let level = MetadataLevel::from_media_type(request.content_type.as_ref());
        let mut ctx = SerializerContext::new(
            Arc::clone(&self.serializers),
            Arc::clone(&self.links),
            base_address,
        )
        .with_metadata_level(level)
        .with_version(self.version);
        if let Some(path) = &request.path {
            ctx = ctx.with_path(path.clone());
        }
        Ok(ctx)
    }

    fn deserializer_context(&self, request: &OperationRequest) -> DeserializerContext {
        let mut ctx =
            DeserializerContext::new(Arc::clone(&self.deserializers)).with_version(self.version);
        if let Some(path) = &request.path {
            ctx = ctx.with_path(path.clone());
        }
        ctx
    }

    /// Resolve the base address payload links are written against: the
    /// request origin joined with the route prefix, always ending in a
    /// slash. A request matched under no route prefix has no base to
    /// offer.
    fn resolve_base_address(request: &OperationRequest) -> FormatResult<Url> {
        let prefix = request
            .route_prefix
            .as_deref()
            .ok_or_else(FormatError::base_address_unresolved)?;
        let origin = &request.request_address[..Position::BeforePath];
        let trimmed = prefix.trim_matches('/');
        let base = if trimmed.is_empty() {
            format!("{origin}/")
        } else {
            format!("{origin}/{trimmed}/")
        };
        Url::parse(&base).map_err(|_| FormatError::base_address_unresolved())
    }

    fn no_converter(request: &OperationRequest) -> FormatError {
        match request.target.as_ref() {
            None => FormatError::missing_target(),
            Some(target) => FormatError::type_not_in_model(target.qualified_name()),
        }
    }

    fn substitute_error(&self, failure: FormatError) -> FormatResult<WriteOutcome> {
        let mut record = ErrorRecord::new().with_message(SUBSTITUTED_ERROR_MESSAGE);
        if self.config.include_error_detail {
            record.exception_message = Some(failure.to_string());
            record.exception_type = Some(failure.kind_name().to_string());
        }
        let translated = to_structured_error(&record);
        let mut writer = MessageWriter::new(self.config.writer_quotas);
        match writer.write_error(&translated, translated.inner.is_some()) {
            Ok(()) => Ok(WriteOutcome::ErrorSubstituted {
                bytes: writer.into_bytes(),
                failure,
            }),
            Err(wire_failure) => {
                error!(error = %wire_failure, "substituted error payload could not be written");
                Err(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edm::{ModelBuilder, PrimitiveKind};

    fn demo_model() -> Arc<Model> {
        let mut builder = ModelBuilder::new("Demo");
        builder
            .complex_type("Address")
            .property("Street", PrimitiveKind::String)
            .property("City", PrimitiveKind::String);
        builder
            .entity_type("Person")
            .key("PerId")
            .required_property("PerId", PrimitiveKind::Int32)
            .property("Name", PrimitiveKind::String)
            .property("HomeAddress", TypeRef::complex("Demo.Address"))
            .navigation_single("Order", "Order")
            .navigation_many("Friends", "Person");
        builder
            .entity_type("Order")
            .key("OrderId")
            .required_property("OrderId", PrimitiveKind::Int32);
        builder.entity_set("People", "Person");
        builder.entity_set("Orders", "Order");
        Arc::new(builder.build().unwrap())
    }

    fn adapter() -> FormatAdapter {
        FormatAdapter::for_all_kinds(demo_model(), FormatterConfig::default())
    }

    fn request() -> OperationRequest {
        OperationRequest::new(Url::parse("http://localhost:8080/svc/People(7)").unwrap())
            .with_route_prefix("svc")
    }

    #[test]
    fn test_unbound_adapter_rejects_io() {
        let template = adapter();
        let err = template.write(&Payload::Value(Value::Null)).unwrap_err();
        assert!(err.to_string().contains("per_operation_instance"));
        let err = template.read_value(b"{}").unwrap_err();
        assert!(err.to_string().contains("per_operation_instance"));
    }

    #[test]
    fn test_payload_kind_selection() {
        let template = adapter();
        let person = TypeRef::entity("Demo.Person");
        let people = TypeRef::collection_of(person.clone());
        let address = TypeRef::complex("Demo.Address");
        let name = TypeRef::Primitive(PrimitiveKind::String);

        let select = |path: Option<ResourcePath>, target: Option<TypeRef>| {
            let mut req = request();
            if let Some(path) = path {
                req = req.with_path(path);
            }
            if let Some(target) = target {
                req = req.with_target(target);
            }
            template.per_operation_instance(req).select_payload_kind()
        };

        assert_eq!(select(None, None).unwrap(), PayloadKind::ServiceDocument);
        assert_eq!(
            select(Some(ResourcePath::empty()), None).unwrap(),
            PayloadKind::ServiceDocument
        );
        assert!(select(None, Some(person.clone())).is_err());

        let people_path = ResourcePath::new(vec![PathSegment::EntitySet("People".into())]);
        assert_eq!(
            select(Some(people_path), Some(people)).unwrap(),
            PayloadKind::Feed
        );

        let person_path = ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
        ]);
        assert_eq!(
            select(Some(person_path.clone()), Some(person.clone())).unwrap(),
            PayloadKind::Entry
        );

        let address_path = ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
            PathSegment::Property("HomeAddress".into()),
        ]);
        assert_eq!(
            select(Some(address_path), Some(address)).unwrap(),
            PayloadKind::Complex
        );

        let name_path = ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
            PathSegment::Property("Name".into()),
        ]);
        assert_eq!(
            select(Some(name_path), Some(name.clone())).unwrap(),
            PayloadKind::Property
        );

        let raw_path = ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
            PathSegment::Property("Name".into()),
            PathSegment::RawValue,
        ]);
        assert_eq!(select(Some(raw_path), Some(name)).unwrap(), PayloadKind::RawValue);

        let single_links = ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
            PathSegment::Links,
            PathSegment::Navigation("Order".into()),
        ]);
        assert_eq!(
            select(Some(single_links), None).unwrap(),
            PayloadKind::EntityReferenceLink
        );

        let many_links = ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
            PathSegment::Links,
            PathSegment::Navigation("Friends".into()),
        ]);
        assert_eq!(
            select(Some(many_links), None).unwrap(),
            PayloadKind::EntityReferenceLinkCollection
        );

        let dangling_links = ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
            PathSegment::Links,
        ]);
        assert!(select(Some(dangling_links), None).is_err());

        let unknown_links = ResourcePath::new(vec![
            PathSegment::EntitySet("People".into()),
            PathSegment::Key("7".into()),
            PathSegment::Links,
            PathSegment::Navigation("Enemies".into()),
        ]);
        assert!(select(Some(unknown_links), None).is_err());

        let typeless = select(Some(person_path), None).unwrap_err();
        assert!(typeless.to_string().contains("target schema type"));
    }

    #[test]
    fn test_base_address_resolution() {
        let address = |request: &OperationRequest| {
            FormatAdapter::resolve_base_address(request).map(|url| url.to_string())
        };

        let plain = OperationRequest::new(
            Url::parse("http://localhost:8080/svc/People(7)?$format=json").unwrap(),
        );
        assert!(address(&plain).is_err());

        assert_eq!(
            address(&plain.clone().with_route_prefix("svc")).unwrap(),
            "http://localhost:8080/svc/"
        );
        assert_eq!(
            address(&plain.clone().with_route_prefix("/api/odata/")).unwrap(),
            "http://localhost:8080/api/odata/"
        );
        assert_eq!(
            address(&plain.with_route_prefix("")).unwrap(),
            "http://localhost:8080/"
        );
    }

    #[test]
    fn test_version_negotiation_through_binding() {
        let template = adapter();
        let bound = template.per_operation_instance(request());
        assert_eq!(bound.response_version(), ProtocolVersion::V3);

        let bound = template.per_operation_instance(
            request()
                .with_version(ProtocolVersion::V3)
                .with_max_version(ProtocolVersion::V1),
        );
        assert_eq!(bound.response_version(), ProtocolVersion::V1);

        let bound = template.per_operation_instance(request().with_version(ProtocolVersion::V2));
        assert_eq!(bound.response_version(), ProtocolVersion::V2);
    }

    #[test]
    fn test_response_content_type_defaults_to_json() {
        let template = adapter();
        let bound = template.per_operation_instance(request());
        assert_eq!(bound.response_content_type().essence(), "application/json");

        let negotiated = MediaType::application_json().with_parameter("odata", "fullmetadata");
        let bound =
            template.per_operation_instance(request().with_content_type(negotiated.clone()));
        assert_eq!(bound.response_content_type(), negotiated);
    }

    #[test]
    fn test_kind_restriction_is_enforced() {
        let model = demo_model();
        let errors_only = FormatAdapter::new(
            model,
            vec![PayloadKind::Error],
            FormatterConfig::default(),
        );
        let bound = errors_only.per_operation_instance(
            request().with_path(ResourcePath::new(vec![
                PathSegment::EntitySet("People".into()),
                PathSegment::Key("7".into()),
            ])).with_target(TypeRef::entity("Demo.Person")),
        );
        let err = bound
            .write(&Payload::Value(Value::Record(edm::Record::untyped())))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "This format adapter does not serve 'entry' payloads."
        );
    }
}
