use serde_json::Value;

use crate::api::ApiError;

/// First message found under any of `fields`, in order.
///
/// Accepts both `{"error": "text"}` and DRF-style `{"field": ["text", ...]}`.
pub fn first_field_error(payload: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match payload.get(*field)? {
        Value::String(message) => Some(message.clone()),
        Value::Array(messages) => messages
            .first()
            .and_then(|m| m.as_str())
            .map(str::to_string),
        _ => None,
    })
}

/// User-facing message for a failed request, falling back to `fallback`
/// when the server did not explain itself
pub fn user_message(error: &ApiError, fields: &[&str], fallback: &str) -> String {
    error
        .payload()
        .and_then(|payload| first_field_error(&payload, fields))
        .unwrap_or_else(|| fallback.to_string())
}
