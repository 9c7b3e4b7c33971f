//! Provider error payload normalization
//!
//! Providers report failures as a JSON object with an `error` or `message`
//! field, as a bare JSON string, or as plain text. This is the only place
//! that knows about those shapes.

use serde_json::Value;

/// Extract a single human-readable message from a failed response body
///
/// Never fails: unparsable bodies are returned verbatim, and an empty body
/// falls back to `status_text`.
pub fn extract_error_message(body: &str, status_text: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(message)) => message,
        Ok(Value::Object(mut fields)) => {
            if let Some(error) = fields.remove("error") {
                value_to_message(error)
            } else if let Some(message) = fields.remove("message") {
                value_to_message(message)
            } else {
                Value::Object(fields).to_string()
            }
        }
        Ok(other) => other.to_string(),
        Err(_) if body.is_empty() => status_text.to_string(),
        Err(_) => body.to_string(),
    }
}

fn value_to_message(value: Value) -> String {
    match value {
        Value::String(message) => message,
        other => other.to_string(),
    }
}
