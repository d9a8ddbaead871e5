//! Structured reply decoding
//!
//! The provider is asked for a single JSON object shaped as
//! `{"output": {feedback?, hints?, snippet?, programmingLanguage?}}`.
//! Replies that are not JSON fail with `MalformedReply`; replies without
//! the top-level `output` key fail with `MissingOutput` (the controller
//! drops both silently). Beyond key presence nothing is enforced: values
//! of the wrong type are ignored rather than rejected.

use serde_json::Value;

use crate::error::{CoachError, Result};
use crate::history::AssistantPayload;

/// Decode a raw provider reply into an assistant payload
pub fn parse_reply(raw: &str) -> Result<AssistantPayload> {
    let value: Value = serde_json::from_str(raw)?;

    let output = value.get("output").ok_or(CoachError::MissingOutput)?;

    Ok(AssistantPayload {
        feedback: text_field(output, "feedback"),
        hints: output
            .get("hints")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        snippet: text_field(output, "snippet"),
        programming_language: text_field(output, "programmingLanguage"),
    })
}

fn text_field(output: &Value, key: &str) -> Option<String> {
    output.get(key).and_then(Value::as_str).map(str::to_string)
}
