//! Entity reference link deserialization, single and collection.
//!
//! Unlike the value-producing deserializers these return the targets
//! directly. Both require the request path to name the navigation
//! property the links belong to; a links payload with no navigation in
//! sight has nothing to attach to.

use url::Url;

use crate::context::DeserializerContext;
use crate::error::{FormatError, FormatResult};

fn require_navigation(ctx: &DeserializerContext) -> FormatResult<()> {
    let path = ctx.path().ok_or_else(FormatError::missing_path)?;
    if path.is_empty() {
        return Err(FormatError::missing_path());
    }
    path.links_navigation(ctx.model())
        .ok_or_else(FormatError::missing_navigation_source)?;
    Ok(())
}

/// Reads one `{"url": ...}` relationship payload.
pub struct ReferenceLinkDeserializer;

impl ReferenceLinkDeserializer {
    pub fn read(
        &self,
        reader: &wire::MessageReader<'_>,
        ctx: &DeserializerContext,
    ) -> FormatResult<Url> {
        require_navigation(ctx)?;
        reader
            .read_entity_reference_link()
            .map_err(FormatError::from)
    }
}

/// Reads a `value`-wrapped collection of relationship payloads.
pub struct ReferenceLinkCollectionDeserializer;

impl ReferenceLinkCollectionDeserializer {
    pub fn read(
        &self,
        reader: &wire::MessageReader<'_>,
        ctx: &DeserializerContext,
    ) -> FormatResult<Vec<Url>> {
        require_navigation(ctx)?;
        reader
            .read_entity_reference_links()
            .map_err(FormatError::from)
    }
}
