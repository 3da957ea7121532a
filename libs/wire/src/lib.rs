//! # Quill Wire Grammar
//!
//! The JSON payload grammar: how entries, feeds, properties, reference
//! links, service documents, and errors look as bytes, and nothing about
//! which of them a given operation should produce (that negotiation lives
//! in the `formatter` crate).
//!
//! ## Purpose
//!
//! - **Writing**: [`MessageWriter`] turns structured wire values
//!   ([`WireRecord`], [`WireValue`], [`StructuredError`], ...) into JSON
//!   text, one payload per writer.
//! - **Reading**: [`MessageReader`] parses a complete payload buffer back
//!   into structured wire values.
//! - **Quotas**: both directions enforce [`MessageQuotas`] cooperatively
//!   during the walk - nesting depth while building or checking the tree,
//!   byte ceilings against the full buffer - and abort without producing a
//!   partial payload.
//!
//! ## Payload grammar
//!
//! ```text
//! entry            {"@type": "Demo.Person", "@id": "...", "Name": "..."}
//! feed             {"value": [entry, entry, ...]}
//! property         {"Age": 42}
//! reference link   {"url": "http://host/People(1)"}
//! link collection  {"value": [{"url": "..."}, ...]}
//! service document {"collections": [{"name": "People", "href": "People"}]}
//! error            {"error": {"code": "...", "message": {"lang": "...",
//!                   "value": "..."}, "innererror": {...}}}
//! raw value        bare lexical text, no JSON framing
//! ```
//!
//! Keys beginning with `@` are annotations; a `<name>@link` key carries
//! the navigation link for property `<name>`. Everything else is data.

pub mod error;
pub mod error_payload;
pub mod quotas;
pub mod reader;
pub mod service_document;
pub mod value;
pub mod writer;

pub use error::{WireError, WireResult};
pub use error_payload::{InnerError, StructuredError};
pub use quotas::MessageQuotas;
pub use reader::MessageReader;
pub use service_document::{ResourceCollection, ServiceDocument};
pub use value::{WireLink, WireProperty, WireRecord, WireScalar, WireValue};
pub use writer::MessageWriter;
