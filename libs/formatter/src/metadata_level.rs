//! Metadata verbosity negotiation.

use crate::media_type::MediaType;

/// How much schema-derived annotation accompanies a written payload.
///
/// Resolved once per operation from the negotiated content type and then
/// fixed: the same content-type input always yields the same level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataLevel {
    /// No annotations at all, not even navigation links.
    None,

    /// Links the host cannot recompute, nothing that is derivable.
    #[default]
    Minimal,

    /// Everything, including type-name annotations on every record.
    Full,
}

impl MetadataLevel {
    /// Resolve the level from the negotiated content type.
    ///
    /// JSON content consults the `odata` parameter (`nometadata`,
    /// `fullmetadata`, `verbose`; anything else means minimal). Legacy
    /// non-JSON formats always carry full metadata. An absent content type
    /// defaults to minimal.
    pub fn from_media_type(content_type: Option<&MediaType>) -> Self {
        let Some(media) = content_type else {
            return MetadataLevel::Minimal;
        };
        if !media.is_json() {
            return MetadataLevel::Full;
        }
        match media.parameter("odata") {
            Some("nometadata") => MetadataLevel::None,
            Some("fullmetadata") | Some("verbose") => MetadataLevel::Full,
            _ => MetadataLevel::Minimal,
        }
    }
}
