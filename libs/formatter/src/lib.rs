//! # Quill Resource Formatter - Dispatch and Error Normalization
//!
//! ## Purpose
//!
//! This crate contains the "Negotiation" layer of the Quill system, sitting
//! between host request handling and the wire grammar:
//! - Payload-kind selection from the routed resource path
//! - Serializer/deserializer providers with schema-lifetime caching
//! - Per-payload-kind converters walking the schema in declaration order
//! - Per-operation format adapter binding (metadata level, version, quotas,
//!   base address)
//! - Translation of host failure records into the structured error payload
//!
//! ## Architecture Role
//!
//! ```text
//! libs/edm  →  [formatter]  →  libs/wire
//!     ↑            ↓               ↓
//! Pure Schema  Dispatch Rules   Payload Grammar
//! Model        Providers        MessageWriter
//! Value        FormatAdapter    MessageReader
//! ```
//!
//! ## What This Crate Contains
//! - **FormatAdapter**: per-operation write/read entry points with error
//!   payload substitution on the write path
//! - **SerializerProvider / DeserializerProvider**: classification plus
//!   concurrent converter caches keyed by schema type
//! - **Converters**: entry, feed, complex, property, raw value, reference
//!   link, service document, and error serializers with their read twins
//! - **Error translation**: `ErrorRecord` → `StructuredError` with the
//!   recursive inner-error chain
//! - Media type, metadata level, and protocol version negotiation
//!
//! ## What This Crate Does NOT Contain
//! - HTTP transport or routing (hosts hand in an already-routed
//!   [`ResourcePath`])
//! - Link URI construction (hosts implement [`LinkGenerator`])
//! - Schema construction (belongs in libs/edm)

pub mod adapter;
mod coerce;
pub mod context;
pub mod de;
pub mod error;
pub mod error_record;
pub mod error_translation;
pub mod links;
pub mod media_type;
pub mod metadata_level;
pub mod path;
pub mod payload;
pub mod payload_kind;
pub mod provider;
pub mod ser;
pub mod version;

pub use adapter::{FormatAdapter, FormatterConfig, OperationRequest, WriteOutcome};
pub use context::{DeserializerContext, SerializerContext};
pub use de::Deserializer;
pub use error::{FormatError, FormatResult};
pub use error_record::{ErrorRecord, ModelState, ModelStateEntry};
pub use error_translation::to_structured_error;
pub use links::{LinkGenerator, NoOpLinkGenerator};
pub use media_type::MediaType;
pub use metadata_level::MetadataLevel;
pub use path::{PathSegment, ResourcePath};
pub use payload::Payload;
pub use payload_kind::PayloadKind;
pub use provider::{DeserializerProvider, SerializerProvider};
pub use ser::Serializer;
pub use version::ProtocolVersion;
