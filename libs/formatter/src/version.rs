//! Protocol version negotiation.
//!
//! Two informational request headers declare the caller's protocol version
//! and the maximum version it accepts. They are negotiated into one
//! response version and never influence payload-kind selection.

use std::fmt;

use num_enum::TryFromPrimitive;

/// Wire protocol generation. `V3` is the default for unversioned requests.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, Default)]
pub enum ProtocolVersion {
    V1 = 1,
    V2 = 2,
    #[default]
    V3 = 3,
}

impl ProtocolVersion {
    /// Parse a version header value such as `"2.0"` or `"2.0;param"`.
    ///
    /// Anything unrecognized is `None`: the headers are informational, a
    /// garbled value is ignored rather than rejected.
    pub fn parse(header: &str) -> Option<Self> {
        let number = header.split(';').next().unwrap_or("").trim();
        match number {
            "1.0" => Some(ProtocolVersion::V1),
            "2.0" => Some(ProtocolVersion::V2),
            "3.0" => Some(ProtocolVersion::V3),
            _ => None,
        }
    }

    /// Negotiate the response version: the declared maximum wins when
    /// present, else the declared version, else the default.
    pub fn negotiate(declared: Option<Self>, declared_max: Option<Self>) -> Self {
        declared_max.or(declared).unwrap_or_default()
    }

    /// Header rendering, `"3.0"` style.
    pub fn as_header_value(&self) -> &'static str {
        match self {
            ProtocolVersion::V1 => "1.0",
            ProtocolVersion::V2 => "2.0",
            ProtocolVersion::V3 => "3.0",
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_header_value())
    }
}
