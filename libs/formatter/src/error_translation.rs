//! Failure record normalization.
//!
//! Translates a host [`ErrorRecord`] into the protocol-stable
//! [`StructuredError`] payload. The public fields copy over verbatim; the
//! debug chain is built from the first of three mutually exclusive
//! sources, tried in priority order:
//!
//! 1. exception detail (`exception_message` present) as a recursive chain
//! 2. `message_detail` as a single message-only node
//! 3. non-empty `model_state`, flattened deterministically
//!
//! A record with none of the three produces no inner error at all, which
//! is how production mode keeps internals out of payloads.

use wire::{InnerError, StructuredError};

use crate::error_record::{ErrorRecord, ModelState, ModelStateEntry};

/// Nested causes beyond this depth are dropped from the chain. The source
/// records arrive from arbitrary host code, so the walk carries its own
/// bound instead of trusting them to be shallow.
const MAX_INNER_DEPTH: usize = 32;

/// Normalize a failure record into the structured error payload shape.
///
/// Total over any record: every combination of set and unset fields maps
/// to some structured error. The result's `inner` is present exactly when
/// the record carries debug-level detail.
pub fn to_structured_error(record: &ErrorRecord) -> StructuredError {
    StructuredError {
        message: record.message.clone(),
        message_language: record.message_language.clone(),
        error_code: record.error_code.clone(),
        inner: inner_error(record),
    }
}

fn inner_error(record: &ErrorRecord) -> Option<InnerError> {
    if record.exception_message.is_some() {
        return Some(exception_chain(record, 1));
    }
    if let Some(detail) = &record.message_detail {
        return Some(InnerError::with_message(detail.clone()));
    }
    match &record.model_state {
        Some(state) if !state.is_empty() => {
            Some(InnerError::with_message(flatten_model_state(state)))
        }
        _ => None,
    }
}

fn exception_chain(record: &ErrorRecord, depth: usize) -> InnerError {
    let nested = record
        .inner
        .as_deref()
        .filter(|_| depth < MAX_INNER_DEPTH)
        .map(|inner| Box::new(exception_chain(inner, depth + 1)));
    InnerError {
        message: record.exception_message.clone(),
        type_name: record.exception_type.clone(),
        stack_trace: record.stack_trace.clone(),
        inner: nested,
    }
}

/// Flatten validation state into one deterministic text block: each key in
/// insertion order as `"<key> : "`, then every message recorded against it
/// terminated by a newline.
fn flatten_model_state(state: &ModelState) -> String {
    let mut text = String::new();
    for (key, entry) in state.iter() {
        text.push_str(key);
        text.push_str(" : ");
        match entry {
            ModelStateEntry::Messages(messages) => {
                for message in messages {
                    text.push_str(message);
                    text.push('\n');
                }
            }
            ModelStateEntry::Description(description) => {
                text.push_str(description);
                text.push('\n');
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_only_record_has_no_inner_error() {
        let record = ErrorRecord::new().with_message("not found");
        let error = to_structured_error(&record);
        assert_eq!(error.message.as_deref(), Some("not found"));
        assert!(error.inner.is_none());
    }

    #[test]
    fn test_public_fields_copy_verbatim_and_unset_stays_unset() {
        let record = ErrorRecord::new()
            .with_message("bad request")
            .with_message_language("en-US");
        let error = to_structured_error(&record);
        assert_eq!(error.message.as_deref(), Some("bad request"));
        assert_eq!(error.message_language.as_deref(), Some("en-US"));
        assert_eq!(error.error_code, None);
    }

    #[test]
    fn test_exception_chain_preserves_each_level() {
        let record = ErrorRecord::new()
            .with_message("public")
            .with_exception("outer boom", "Demo.OuterFault", "outer trace")
            .with_inner(
                ErrorRecord::new()
                    .with_exception("inner boom", "Demo.InnerFault", "inner trace"),
            );
        let error = to_structured_error(&record);
        let chain = error.inner.unwrap();
        assert_eq!(chain.depth(), 2);
        assert_eq!(chain.message.as_deref(), Some("outer boom"));
        assert_eq!(chain.type_name.as_deref(), Some("Demo.OuterFault"));
        assert_eq!(chain.stack_trace.as_deref(), Some("outer trace"));
        let nested = chain.inner.unwrap();
        assert_eq!(nested.message.as_deref(), Some("inner boom"));
        assert_eq!(nested.type_name.as_deref(), Some("Demo.InnerFault"));
    }

    #[test]
    fn test_exception_branch_beats_message_detail() {
        let record = ErrorRecord::new()
            .with_exception("boom", "Demo.Fault", "trace")
            .with_message_detail("ignored detail");
        let chain = to_structured_error(&record).inner.unwrap();
        assert_eq!(chain.message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_message_detail_beats_model_state() {
        let mut state = ModelState::new();
        state.add_message("Name", "is required");
        let record = ErrorRecord::new()
            .with_message_detail("the detail")
            .with_model_state(state);
        let chain = to_structured_error(&record).inner.unwrap();
        assert_eq!(chain.message.as_deref(), Some("the detail"));
        assert!(chain.type_name.is_none());
        assert!(chain.inner.is_none());
    }

    #[test]
    fn test_model_state_flattening_format() {
        let mut state = ModelState::new();
        state.add_message("order.Total", "must be positive");
        state.add_message("order.Total", "must be below 1000");
        state.set_description("retries", "3");
        let record = ErrorRecord::new().with_model_state(state);
        let chain = to_structured_error(&record).inner.unwrap();
        assert_eq!(
            chain.message.as_deref(),
            Some("order.Total : must be positive\nmust be below 1000\nretries : 3\n")
        );
    }

    #[test]
    fn test_empty_model_state_produces_no_inner_error() {
        let record = ErrorRecord::new().with_model_state(ModelState::new());
        assert!(to_structured_error(&record).inner.is_none());
    }

    #[test]
    fn test_runaway_nesting_is_depth_capped() {
        let mut record = ErrorRecord::new().with_exception("level", "Demo.Fault", "trace");
        for _ in 0..100 {
            record = ErrorRecord::new()
                .with_exception("level", "Demo.Fault", "trace")
                .with_inner(record);
        }
        let chain = to_structured_error(&record).inner.unwrap();
        assert_eq!(chain.depth(), MAX_INNER_DEPTH);
    }
}
