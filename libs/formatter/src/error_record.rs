//! The host-supplied failure record.
//!
//! Hosts hand unhandled faults and validation failures to the formatter as
//! an [`ErrorRecord`]: a closed record with one optional field per
//! recognized piece of failure information. The error translator reads
//! exactly these fields, nothing is open-ended.

/// A generic failure description produced by the host.
///
/// `message`, `message_language`, and `error_code` are the public face of
/// the failure. `exception_message`, `exception_type`, `stack_trace`, and
/// the nested `inner` record carry debug-level detail; `message_detail`
/// and `model_state` are lower-fidelity fallbacks for the same purpose.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorRecord {
    pub message: Option<String>,
    pub message_language: Option<String>,
    pub message_detail: Option<String>,
    pub error_code: Option<String>,
    pub exception_message: Option<String>,
    pub exception_type: Option<String>,
    pub stack_trace: Option<String>,
    pub inner: Option<Box<ErrorRecord>>,
    pub model_state: Option<ModelState>,
}

impl ErrorRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_message_language(mut self, language: impl Into<String>) -> Self {
        self.message_language = Some(language.into());
        self
    }

    pub fn with_message_detail(mut self, detail: impl Into<String>) -> Self {
        self.message_detail = Some(detail.into());
        self
    }

    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    pub fn with_exception(
        mut self,
        message: impl Into<String>,
        type_name: impl Into<String>,
        stack_trace: impl Into<String>,
    ) -> Self {
        self.exception_message = Some(message.into());
        self.exception_type = Some(type_name.into());
        self.stack_trace = Some(stack_trace.into());
        self
    }

    pub fn with_inner(mut self, inner: ErrorRecord) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    pub fn with_model_state(mut self, state: ModelState) -> Self {
        self.model_state = Some(state);
        self
    }

    /// Whether this record carries any debug-level detail. Decides whether
    /// the translated error exposes an inner error at all.
    pub fn has_debug_detail(&self) -> bool {
        self.exception_message.is_some()
            || self.message_detail.is_some()
            || self.model_state.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// Validation state: ordered keys, each carrying the messages recorded
/// against it (or one scalar description).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelState {
    entries: Vec<(String, ModelStateEntry)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelStateEntry {
    /// Messages recorded against the key, flattened one per line.
    Messages(Vec<String>),

    /// A single non-message value, flattened through its string form.
    Description(String),
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a key, creating the key on first use.
    /// Keys keep insertion order; a description-valued key is left as is.
    pub fn add_message(&mut self, key: impl Into<String>, message: impl Into<String>) {
        let key = key.into();
        let message = message.into();
        for (existing, entry) in &mut self.entries {
            if *existing == key {
                if let ModelStateEntry::Messages(messages) = entry {
                    messages.push(message);
                }
                return;
            }
        }
        self.entries
            .push((key, ModelStateEntry::Messages(vec![message])));
    }

    /// Record a scalar description against a key, replacing anything
    /// already recorded there.
    pub fn set_description(&mut self, key: impl Into<String>, description: impl Into<String>) {
        let key = key.into();
        let entry = ModelStateEntry::Description(description.into());
        for (existing, slot) in &mut self.entries {
            if *existing == key {
                *slot = entry;
                return;
            }
        }
        self.entries.push((key, entry));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelStateEntry)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_state_keeps_insertion_order() {
        let mut state = ModelState::new();
        state.add_message("order.Total", "must be positive");
        state.add_message("customer.Name", "is required");
        state.add_message("order.Total", "must be below 1000");

        let keys: Vec<&str> = state.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["order.Total", "customer.Name"]);
        match state.iter().next().unwrap().1 {
            ModelStateEntry::Messages(messages) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected entry: {other:?}"),
        };
    }

    #[test]
    fn test_debug_detail_detection() {
        assert!(!ErrorRecord::new().with_message("nope").has_debug_detail());
        assert!(ErrorRecord::new()
            .with_message_detail("detail")
            .has_debug_detail());
        assert!(ErrorRecord::new()
            .with_exception("boom", "Demo.Fault", "at line 3")
            .has_debug_detail());

        let empty_state = ErrorRecord::new().with_model_state(ModelState::new());
        assert!(!empty_state.has_debug_detail());
    }
}
