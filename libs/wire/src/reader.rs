//! Payload reading.

use serde_json::{Map, Value as Json};
use tracing::warn;
use url::Url;

use crate::error::{WireError, WireResult};
use crate::quotas::MessageQuotas;
use crate::value::{keys, WireRecord, WireScalar, WireValue};

/// Reads one complete payload buffer back into structured wire values.
///
/// The byte ceiling is checked against the buffer at construction, before
/// any parsing happens; the depth ceiling is checked while the parsed tree
/// is walked. A reader borrows its buffer and performs no I/O.
#[derive(Debug)]
pub struct MessageReader<'a> {
    payload: &'a [u8],
    quotas: MessageQuotas,
}

impl<'a> MessageReader<'a> {
    pub fn new(payload: &'a [u8], quotas: MessageQuotas) -> WireResult<Self> {
        let consumed = payload.len() as u64;
        if consumed > quotas.max_message_bytes {
            warn!(
                limit = quotas.max_message_bytes,
                consumed, "payload rejected: byte quota exceeded"
            );
            return Err(WireError::ReceivedBytesExceeded {
                limit: quotas.max_message_bytes,
                consumed,
            });
        }
        Ok(Self { payload, quotas })
    }

    pub fn quotas(&self) -> MessageQuotas {
        self.quotas
    }

    /// Read a single entry payload.
    pub fn read_entry(&self) -> WireResult<WireRecord> {
        match self.root()? {
            Json::Object(map) => json_to_record(map),
            other => Err(WireError::unexpected_shape(
                "an entry object",
                json_shape(&other),
            )),
        }
    }

    /// Read a feed of entries.
    pub fn read_feed(&self) -> WireResult<Vec<WireRecord>> {
        let members = self.wrapped_array("a feed object")?;
        members
            .into_iter()
            .map(|member| match member {
                Json::Object(map) => json_to_record(map),
                other => Err(WireError::unexpected_shape(
                    "an entry object inside the feed",
                    json_shape(&other),
                )),
            })
            .collect()
    }

    /// Read a single named property: `(name, value)`.
    pub fn read_property(&self) -> WireResult<(String, WireValue)> {
        match self.root()? {
            Json::Object(map) => {
                let mut data = map
                    .into_iter()
                    .filter(|(name, _)| !is_annotation_key(name));
                let first = data.next();
                match (first, data.next()) {
                    (Some((name, value)), None) => Ok((name, json_to_wire(value)?)),
                    _ => Err(WireError::unexpected_shape(
                        "an object carrying exactly one property",
                        "an object with zero or several properties".to_string(),
                    )),
                }
            }
            other => Err(WireError::unexpected_shape(
                "a property object",
                json_shape(&other),
            )),
        }
    }

    /// Read a single entity reference link.
    pub fn read_entity_reference_link(&self) -> WireResult<Url> {
        match self.root()? {
            Json::Object(map) => url_member(&map),
            other => Err(WireError::unexpected_shape(
                "a reference link object",
                json_shape(&other),
            )),
        }
    }

    /// Read a collection of entity reference links.
    pub fn read_entity_reference_links(&self) -> WireResult<Vec<Url>> {
        let members = self.wrapped_array("a reference link collection")?;
        members
            .into_iter()
            .map(|member| match member {
                Json::Object(map) => url_member(&map),
                other => Err(WireError::unexpected_shape(
                    "a reference link object",
                    json_shape(&other),
                )),
            })
            .collect()
    }

    /// Read a raw-value payload as lexical text. Coercion to a schema
    /// kind is the conversion layer's job.
    pub fn read_raw_value(&self) -> WireResult<String> {
        std::str::from_utf8(self.payload)
            .map(str::to_string)
            .map_err(|e| WireError::malformed(format!("raw value is not UTF-8: {e}")))
    }

    fn root(&self) -> WireResult<Json> {
        let value: Json = serde_json::from_slice(self.payload)?;
        ensure_tree_depth(&value, 1, self.quotas.max_nesting_depth)?;
        Ok(value)
    }

    fn wrapped_array(&self, expected: &'static str) -> WireResult<Vec<Json>> {
        match self.root()? {
            Json::Object(mut map) => match map.remove(keys::VALUE) {
                Some(Json::Array(members)) => Ok(members),
                Some(other) => Err(WireError::unexpected_shape(
                    "an array in the 'value' member",
                    json_shape(&other),
                )),
                None => Err(WireError::unexpected_shape(
                    "an object carrying a 'value' member",
                    "an object without one".to_string(),
                )),
            },
            other => Err(WireError::unexpected_shape(expected, json_shape(&other))),
        }
    }
}

fn is_annotation_key(name: &str) -> bool {
    name.starts_with('@') || name.ends_with(keys::LINK_SUFFIX)
}

fn url_member(map: &Map<String, Json>) -> WireResult<Url> {
    match map.get(keys::URL) {
        Some(Json::String(text)) => Url::parse(text)
            .map_err(|e| WireError::malformed(format!("reference link '{text}' is not a valid URI: {e}"))),
        Some(other) => Err(WireError::unexpected_shape(
            "a string in the 'url' member",
            json_shape(other),
        )),
        None => Err(WireError::unexpected_shape(
            "an object carrying a 'url' member",
            "an object without one".to_string(),
        )),
    }
}

fn json_to_record(map: Map<String, Json>) -> WireResult<WireRecord> {
    let mut record = WireRecord::new(None);
    for (name, value) in map {
        if name == keys::TYPE {
            match value {
                Json::String(type_name) => record.type_name = Some(type_name),
                other => {
                    return Err(WireError::unexpected_shape(
                        "a string type annotation",
                        json_shape(&other),
                    ))
                }
            }
        } else if name == keys::ID {
            record.id = parse_link(&name, value)?;
        } else if name == keys::EDIT_LINK {
            record.edit_link = parse_link(&name, value)?;
        } else if let Some(link_name) = name.strip_suffix(keys::LINK_SUFFIX) {
            if let Some(target) = parse_link(&name, value)? {
                record.push_link(link_name, target);
            }
        } else if name.starts_with('@') {
            // Unrecognized annotations are skipped for forward compatibility.
        } else {
            record.push_property(name, json_to_wire(value)?);
        }
    }
    Ok(record)
}

fn parse_link(key: &str, value: Json) -> WireResult<Option<Url>> {
    match value {
        Json::String(text) => Url::parse(&text)
            .map(Some)
            .map_err(|e| WireError::malformed(format!("link annotation '{key}' is not a valid URI: {e}"))),
        other => Err(WireError::unexpected_shape(
            "a string link annotation",
            json_shape(&other),
        )),
    }
}

fn json_to_wire(value: Json) -> WireResult<WireValue> {
    match value {
        Json::Null => Ok(WireValue::Null),
        Json::Bool(b) => Ok(WireValue::Scalar(WireScalar::Bool(b))),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(WireValue::Scalar(WireScalar::Int64(i)))
            } else if let Some(d) = n.as_f64() {
                Ok(WireValue::Scalar(WireScalar::Double(d)))
            } else {
                Err(WireError::malformed(format!("number {n} is out of range")))
            }
        }
        Json::String(s) => Ok(WireValue::Scalar(WireScalar::String(s))),
        Json::Array(items) => Ok(WireValue::Collection(
            items
                .into_iter()
                .map(json_to_wire)
                .collect::<WireResult<Vec<_>>>()?,
        )),
        Json::Object(map) => Ok(WireValue::Structured(json_to_record(map)?)),
    }
}

fn ensure_tree_depth(value: &Json, depth: u32, limit: u32) -> WireResult<()> {
    match value {
        Json::Object(map) => {
            if depth > limit {
                return Err(WireError::DepthExceeded { limit, depth });
            }
            for member in map.values() {
                ensure_tree_depth(member, depth + 1, limit)?;
            }
            Ok(())
        }
        Json::Array(items) => {
            if depth > limit {
                return Err(WireError::DepthExceeded { limit, depth });
            }
            for item in items {
                ensure_tree_depth(item, depth + 1, limit)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn json_shape(value: &Json) -> String {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
    .to_string()
}
