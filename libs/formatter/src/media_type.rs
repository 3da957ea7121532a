//! Content-type parsing for format negotiation.

use std::fmt;

/// A parsed media type: `type/subtype` plus ordered parameters.
///
/// Names and values are ASCII-lowercased at parse time (media types and
/// their parameters are case-insensitive on the wire); quoting around
/// parameter values is stripped. Parameters keep their declared order so
/// unrecognized ones, charset included, pass through to the response
/// content type unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    kind: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

impl MediaType {
    /// Parse a content-type header value. Returns `None` for values that
    /// are not a well-formed media type; negotiation treats those the same
    /// as an absent header.
    pub fn parse(header: &str) -> Option<Self> {
        let mut segments = header.split(';');
        let essence = segments.next()?.trim();
        let (kind, subtype) = essence.split_once('/')?;
        if kind.is_empty() || subtype.is_empty() {
            return None;
        }

        let mut parameters = Vec::new();
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, value) = segment.split_once('=')?;
            let value = value.trim().trim_matches('"');
            parameters.push((
                name.trim().to_ascii_lowercase(),
                value.to_ascii_lowercase(),
            ));
        }

        Some(Self {
            kind: kind.trim().to_ascii_lowercase(),
            subtype: subtype.trim().to_ascii_lowercase(),
            parameters,
        })
    }

    pub fn application_json() -> Self {
        Self {
            kind: "application".to_string(),
            subtype: "json".to_string(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters
            .push((name.to_ascii_lowercase(), value.to_ascii_lowercase()));
        self
    }

    pub fn essence(&self) -> String {
        format!("{}/{}", self.kind, self.subtype)
    }

    pub fn is_json(&self) -> bool {
        self.kind == "application" && self.subtype == "json"
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.parameters
            .iter()
            .find_map(|(n, v)| (*n == wanted).then_some(v.as_str()))
    }

    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, "; {name}={value}")?;
        }
        Ok(())
    }
}
