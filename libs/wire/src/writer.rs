//! Payload writing.

use serde_json::{Map, Value as Json};
use tracing::warn;
use url::Url;

use crate::error::{WireError, WireResult};
use crate::error_payload::{InnerError, StructuredError};
use crate::quotas::MessageQuotas;
use crate::service_document::ServiceDocument;
use crate::value::{keys, WireRecord, WireScalar, WireValue};

/// Writes one payload into an owned buffer, enforcing quotas as the
/// payload tree is walked.
///
/// A writer is a per-operation object: construct one, call exactly one
/// `write_*` entry point, then take the bytes with [`into_bytes`]. Nothing
/// reaches the buffer unless the whole payload passed the quotas, so a
/// failed write never leaves a partial payload behind.
///
/// [`into_bytes`]: MessageWriter::into_bytes
#[derive(Debug)]
pub struct MessageWriter {
    quotas: MessageQuotas,
    out: Vec<u8>,
}

impl MessageWriter {
    pub fn new(quotas: MessageQuotas) -> Self {
        Self {
            quotas,
            out: Vec::new(),
        }
    }

    pub fn quotas(&self) -> MessageQuotas {
        self.quotas
    }

    pub fn bytes(&self) -> &[u8] {
        &self.out
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    /// Write a single entry payload.
    pub fn write_entry(&mut self, entry: &WireRecord) -> WireResult<()> {
        let root = Json::Object(self.record_to_json(entry, 1)?);
        self.commit(&root)
    }

    /// Write a feed of entries.
    pub fn write_feed(&mut self, entries: &[WireRecord]) -> WireResult<()> {
        self.ensure_depth(1)?;
        self.ensure_depth(2)?;
        let mut members = Vec::with_capacity(entries.len());
        for entry in entries {
            members.push(Json::Object(self.record_to_json(entry, 3)?));
        }
        let mut root = Map::new();
        root.insert(keys::VALUE.to_string(), Json::Array(members));
        self.commit(&Json::Object(root))
    }

    /// Write a single named property.
    pub fn write_property(&mut self, name: &str, value: &WireValue) -> WireResult<()> {
        self.ensure_depth(1)?;
        let mut root = Map::new();
        root.insert(name.to_string(), self.value_to_json(value, 2)?);
        self.commit(&Json::Object(root))
    }

    /// Write a bare scalar as lexical text, without JSON framing.
    pub fn write_raw_value(&mut self, scalar: &WireScalar) -> WireResult<()> {
        self.commit_text(scalar.to_text())
    }

    /// Write a single entity reference link.
    pub fn write_entity_reference_link(&mut self, target: &Url) -> WireResult<()> {
        self.ensure_depth(1)?;
        let mut root = Map::new();
        root.insert(keys::URL.to_string(), Json::String(target.to_string()));
        self.commit(&Json::Object(root))
    }

    /// Write a collection of entity reference links.
    pub fn write_entity_reference_links(&mut self, targets: &[Url]) -> WireResult<()> {
        self.ensure_depth(1)?;
        self.ensure_depth(2)?;
        self.ensure_depth(3)?;
        let members = targets
            .iter()
            .map(|t| {
                let mut link = Map::new();
                link.insert(keys::URL.to_string(), Json::String(t.to_string()));
                Json::Object(link)
            })
            .collect();
        let mut root = Map::new();
        root.insert(keys::VALUE.to_string(), Json::Array(members));
        self.commit(&Json::Object(root))
    }

    /// Write a service document.
    pub fn write_service_document(&mut self, document: &ServiceDocument) -> WireResult<()> {
        self.ensure_depth(1)?;
        self.ensure_depth(2)?;
        self.ensure_depth(3)?;
        let members = document
            .collections()
            .iter()
            .map(|c| {
                let mut entry = Map::new();
                entry.insert("name".to_string(), Json::String(c.name.clone()));
                entry.insert("href".to_string(), Json::String(c.href.clone()));
                Json::Object(entry)
            })
            .collect();
        let mut root = Map::new();
        root.insert(keys::COLLECTIONS.to_string(), Json::Array(members));
        self.commit(&Json::Object(root))
    }

    /// Write an error payload. The debug chain is emitted only when
    /// `include_debug` is set; a production error carries nothing beyond
    /// code, language, and message.
    pub fn write_error(&mut self, error: &StructuredError, include_debug: bool) -> WireResult<()> {
        let mut body = Map::new();
        if let Some(code) = &error.error_code {
            body.insert("code".to_string(), Json::String(code.clone()));
        }
        if error.message.is_some() || error.message_language.is_some() {
            let mut message = Map::new();
            if let Some(lang) = &error.message_language {
                message.insert("lang".to_string(), Json::String(lang.clone()));
            }
            message.insert(
                keys::VALUE.to_string(),
                match &error.message {
                    Some(text) => Json::String(text.clone()),
                    None => Json::Null,
                },
            );
            body.insert("message".to_string(), Json::Object(message));
        }
        if include_debug {
            if let Some(inner) = &error.inner {
                body.insert("innererror".to_string(), inner_to_json(inner));
            }
        }
        let mut root = Map::new();
        root.insert(keys::ERROR.to_string(), Json::Object(body));
        self.commit(&Json::Object(root))
    }

    fn record_to_json(&self, record: &WireRecord, depth: u32) -> WireResult<Map<String, Json>> {
        self.ensure_depth(depth)?;
        let mut map = Map::new();
        if let Some(type_name) = &record.type_name {
            map.insert(keys::TYPE.to_string(), Json::String(type_name.clone()));
        }
        if let Some(id) = &record.id {
            map.insert(keys::ID.to_string(), Json::String(id.to_string()));
        }
        if let Some(edit) = &record.edit_link {
            map.insert(keys::EDIT_LINK.to_string(), Json::String(edit.to_string()));
        }
        for link in &record.links {
            map.insert(
                format!("{}{}", link.name, keys::LINK_SUFFIX),
                Json::String(link.target.to_string()),
            );
        }
        for property in record.properties() {
            map.insert(
                property.name.clone(),
                self.value_to_json(&property.value, depth + 1)?,
            );
        }
        Ok(map)
    }

    fn value_to_json(&self, value: &WireValue, depth: u32) -> WireResult<Json> {
        match value {
            WireValue::Null => Ok(Json::Null),
            WireValue::Scalar(scalar) => Ok(scalar_to_json(scalar)),
            WireValue::Structured(record) => {
                Ok(Json::Object(self.record_to_json(record, depth)?))
            }
            WireValue::Collection(items) => {
                self.ensure_depth(depth)?;
                let members = items
                    .iter()
                    .map(|item| self.value_to_json(item, depth + 1))
                    .collect::<WireResult<Vec<_>>>()?;
                Ok(Json::Array(members))
            }
        }
    }

    fn ensure_depth(&self, depth: u32) -> WireResult<()> {
        if depth > self.quotas.max_nesting_depth {
            return Err(WireError::DepthExceeded {
                limit: self.quotas.max_nesting_depth,
                depth,
            });
        }
        Ok(())
    }

    fn commit(&mut self, root: &Json) -> WireResult<()> {
        let text = serde_json::to_string(root)?;
        self.commit_text(text)
    }

    fn commit_text(&mut self, text: String) -> WireResult<()> {
        let consumed = (self.out.len() + text.len()) as u64;
        if consumed > self.quotas.max_message_bytes {
            warn!(
                limit = self.quotas.max_message_bytes,
                consumed, "payload write aborted: byte quota exceeded"
            );
            return Err(WireError::WrittenBytesExceeded {
                limit: self.quotas.max_message_bytes,
                consumed,
            });
        }
        self.out.extend_from_slice(text.as_bytes());
        Ok(())
    }
}

fn scalar_to_json(scalar: &WireScalar) -> Json {
    match scalar {
        WireScalar::String(s) => Json::String(s.clone()),
        WireScalar::Bool(b) => Json::Bool(*b),
        WireScalar::Int64(i) => Json::Number((*i).into()),
        WireScalar::Double(d) => serde_json::Number::from_f64(*d)
            .map(Json::Number)
            .unwrap_or(Json::Null),
    }
}

fn inner_to_json(inner: &InnerError) -> Json {
    let mut map = Map::new();
    if let Some(message) = &inner.message {
        map.insert("message".to_string(), Json::String(message.clone()));
    }
    if let Some(type_name) = &inner.type_name {
        map.insert("type".to_string(), Json::String(type_name.clone()));
    }
    if let Some(stack) = &inner.stack_trace {
        map.insert("stacktrace".to_string(), Json::String(stack.clone()));
    }
    if let Some(nested) = &inner.inner {
        map.insert("internalexception".to_string(), inner_to_json(nested));
    }
    Json::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn written(writer: MessageWriter) -> Json {
        serde_json::from_slice(&writer.into_bytes()).unwrap()
    }

    #[test]
    fn test_entry_includes_annotations_links_and_properties() {
        let mut record = WireRecord::new(Some("Demo.Person".to_string()));
        record.id = Some(Url::parse("http://localhost/People(7)").unwrap());
        record.push_link("Order", Url::parse("http://localhost/People(7)/Order").unwrap());
        record.push_property("PerId", WireValue::Scalar(WireScalar::Int64(7)));
        record.push_property("Name", WireValue::Scalar(WireScalar::String("Ada".into())));

        let mut writer = MessageWriter::new(MessageQuotas::default());
        writer.write_entry(&record).unwrap();
        assert_eq!(
            written(writer),
            json!({
                "@type": "Demo.Person",
                "@id": "http://localhost/People(7)",
                "Order@link": "http://localhost/People(7)/Order",
                "PerId": 7,
                "Name": "Ada",
            })
        );
    }

    #[test]
    fn test_feed_wraps_entries_in_value_array() {
        let entry = WireRecord::new(None)
            .with_property("PerId", WireValue::Scalar(WireScalar::Int64(1)));
        let mut writer = MessageWriter::new(MessageQuotas::default());
        writer.write_feed(std::slice::from_ref(&entry)).unwrap();
        assert_eq!(written(writer), json!({"value": [{"PerId": 1}]}));
    }

    #[test]
    fn test_nested_depth_breach_aborts_without_output() {
        let nested = WireRecord::new(None).with_property(
            "Inner",
            WireValue::Structured(WireRecord::new(None).with_property(
                "Leaf",
                WireValue::Scalar(WireScalar::Bool(true)),
            )),
        );
        let mut writer =
            MessageWriter::new(MessageQuotas::default().with_max_nesting_depth(1));
        let err = writer.write_entry(&nested).unwrap_err();
        assert_eq!(err, WireError::DepthExceeded { limit: 1, depth: 2 });
        assert!(writer.bytes().is_empty());
    }

    #[test]
    fn test_byte_quota_breach_reports_consumed_total() {
        let record = WireRecord::new(None)
            .with_property("Name", WireValue::Scalar(WireScalar::String("Ada".into())));
        let mut writer =
            MessageWriter::new(MessageQuotas::default().with_max_message_bytes(4));
        let err = writer.write_entry(&record).unwrap_err();
        match err {
            WireError::WrittenBytesExceeded { limit, consumed } => {
                assert_eq!(limit, 4);
                assert_eq!(consumed, r#"{"Name":"Ada"}"#.len() as u64);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(writer.bytes().is_empty());
    }

    #[test]
    fn test_error_payload_gates_debug_chain() {
        let error = StructuredError {
            message: Some("It failed".to_string()),
            message_language: Some("en-US".to_string()),
            error_code: Some("500".to_string()),
            inner: Some(InnerError {
                message: Some("cause".to_string()),
                type_name: Some("FailureKind".to_string()),
                stack_trace: Some("at frame 0".to_string()),
                inner: Some(Box::new(InnerError::with_message("root cause"))),
            }),
        };

        let mut debug_writer = MessageWriter::new(MessageQuotas::default());
        debug_writer.write_error(&error, true).unwrap();
        assert_eq!(
            written(debug_writer),
            json!({
                "error": {
                    "code": "500",
                    "message": {"lang": "en-US", "value": "It failed"},
                    "innererror": {
                        "message": "cause",
                        "type": "FailureKind",
                        "stacktrace": "at frame 0",
                        "internalexception": {"message": "root cause"},
                    },
                }
            })
        );

        let mut plain_writer = MessageWriter::new(MessageQuotas::default());
        plain_writer.write_error(&error, false).unwrap();
        assert_eq!(
            written(plain_writer),
            json!({
                "error": {
                    "code": "500",
                    "message": {"lang": "en-US", "value": "It failed"},
                }
            })
        );
    }

    #[test]
    fn test_reference_links_and_service_document_shapes() {
        let mut writer = MessageWriter::new(MessageQuotas::default());
        writer
            .write_entity_reference_link(&Url::parse("http://localhost/samplelink").unwrap())
            .unwrap();
        assert_eq!(written(writer), json!({"url": "http://localhost/samplelink"}));

        let mut writer = MessageWriter::new(MessageQuotas::default());
        let doc = ServiceDocument::new().with("People", "People");
        writer.write_service_document(&doc).unwrap();
        assert_eq!(
            written(writer),
            json!({"collections": [{"name": "People", "href": "People"}]})
        );
    }

    #[test]
    fn test_raw_value_has_no_json_framing() {
        let mut writer = MessageWriter::new(MessageQuotas::default());
        writer
            .write_raw_value(&WireScalar::String("Redmond".into()))
            .unwrap();
        assert_eq!(writer.bytes(), b"Redmond");
    }
}
