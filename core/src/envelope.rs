//! Response envelope handling.
//!
//! The server wraps most payloads as `{ "success", "message", "data",
//! "timestamp" }`, while some endpoints (login, stats) and older deployments
//! answer with the bare object or array. Callers never need to know which.

use serde_json::Value;

/// Return `data` when `value` is an object carrying a non-null `data` field,
/// otherwise `value` itself.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// The envelope's `message` field, if present.
pub fn envelope_message(value: &Value) -> Option<&str> {
    value.get("message").and_then(Value::as_str)
}
