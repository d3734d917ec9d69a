//! Envelope import from wire text.
//!
//! Handles the string-vs-structure ambiguity of each layer: text is parsed,
//! already-decoded values pass through untouched.

use serde_json::Value;

use super::{DecodeError, RawEnvelope};

/// Parse the outermost layer. Text that is not JSON is a hard failure.
pub(crate) fn parse_outer(raw: RawEnvelope) -> Result<Value, DecodeError> {
    match raw {
        RawEnvelope::Text(text) | RawEnvelope::Value(Value::String(text)) => {
            serde_json::from_str(&text).map_err(DecodeError::MalformedJson)
        }
        RawEnvelope::Value(value) => Ok(value),
    }
}

/// Parse an inner `result` layer; `None` when string-encoded JSON is invalid.
pub(crate) fn parse_inner(value: Value) -> Option<Value> {
    match value {
        Value::String(text) => serde_json::from_str(&text).ok(),
        other => Some(other),
    }
}
