//! Link generation seam.
//!
//! The formatter never invents URIs. Entry identity, edit, and navigation
//! links come from the host through this trait; the only URI work done
//! locally is base-address resolution on the adapter.

use edm::{EntityType, NavigationProperty, Record};
use url::Url;

use crate::context::SerializerContext;

/// Host-implemented link construction for written entries.
///
/// Every method may decline by returning `None`. Identity and edit links
/// are simply omitted when declined; a declined navigation link for a
/// property the model marks as link-required fails the write.
pub trait LinkGenerator: Send + Sync {
    /// The entry's identity link, written as its `@id` annotation.
    fn id_link(&self, entry: &Record, entity: &EntityType, ctx: &SerializerContext)
        -> Option<Url>;

    /// The entry's edit link, written as its `@editLink` annotation.
    fn edit_link(
        &self,
        entry: &Record,
        entity: &EntityType,
        ctx: &SerializerContext,
    ) -> Option<Url>;

    /// The address of one navigation relationship off the entry.
    fn navigation_link(
        &self,
        entry: &Record,
        navigation: &NavigationProperty,
        ctx: &SerializerContext,
    ) -> Option<Url>;
}

/// Declines every link. For hosts whose models carry no link-required
/// navigation properties and whose payloads need no entry addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLinkGenerator;

impl LinkGenerator for NoOpLinkGenerator {
    fn id_link(&self, _: &Record, _: &EntityType, _: &SerializerContext) -> Option<Url> {
        None
    }

    fn edit_link(&self, _: &Record, _: &EntityType, _: &SerializerContext) -> Option<Url> {
        None
    }

    fn navigation_link(
        &self,
        _: &Record,
        _: &NavigationProperty,
        _: &SerializerContext,
    ) -> Option<Url> {
        None
    }
}
