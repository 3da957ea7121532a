//! # Quill Entity Data Model
//!
//! Declarative schema for resource payloads: entity types, complex types,
//! entity sets, and the navigation relationships between them, plus the
//! closed domain value model that instances of those types are carried in
//! at runtime.
//!
//! ## Purpose
//!
//! The formatter layer needs to answer three questions about any value it
//! is asked to convert: what schema type describes it, which properties
//! does that type declare (in declaration order), and what kind of scalar
//! does each property carry. This crate answers those questions and
//! nothing else - it performs no serialization and owns no wire format.
//!
//! ## Architecture Role
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │     edm      │────▶│  formatter   │────▶│      wire        │
//! │ (this crate) │     │ (dispatch &  │     │ (JSON grammar &  │
//! │ schema+values│     │  conversion) │     │  quotas)         │
//! └──────────────┘     └──────────────┘     └──────────────────┘
//! ```
//!
//! A [`Model`] is immutable after [`ModelBuilder::build`] publishes it and
//! is shared across operations behind an `Arc`. Lookups never allocate.
//!
//! ## Usage
//!
//! ```rust
//! use edm::{ModelBuilder, PrimitiveKind, TypeRef};
//!
//! let mut builder = ModelBuilder::new("Demo");
//! builder
//!     .complex_type("Address")
//!     .property("Street", PrimitiveKind::String)
//!     .property("City", PrimitiveKind::String);
//! builder
//!     .entity_type("Person")
//!     .key("PerId")
//!     .required_property("PerId", PrimitiveKind::Int32)
//!     .property("Name", PrimitiveKind::String)
//!     .property("HomeAddress", TypeRef::complex("Demo.Address"));
//! builder.entity_set("People", "Person");
//! let model = builder.build().expect("valid model");
//! assert!(model.entity_set("People").is_some());
//! ```

pub mod builder;
pub mod error;
pub mod model;
pub mod name;
pub mod primitive;
pub mod property;
pub mod schema;
pub mod type_ref;
pub mod value;

pub use builder::{ComplexTypeBuilder, EntityTypeBuilder, ModelBuilder};
pub use error::ModelError;
pub use model::Model;
pub use name::TypeName;
pub use primitive::PrimitiveKind;
pub use property::{NavigationProperty, StructuralProperty};
pub use schema::{ComplexType, EntitySet, EntityType};
pub use type_ref::TypeRef;
pub use value::{Record, Scalar, Value};
