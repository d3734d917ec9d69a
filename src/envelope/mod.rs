//! Envelope decoding - unwraps backend responses into usable payloads.
//!
//! The prediction backend returns its payload wrapped in one or more
//! `{"result": ..., "status": ..., "server_code": ...}` envelopes, where
//! `result` is frequently the payload serialized to a JSON *string* rather
//! than a nested object. Observed responses nest 1-4 layers deep.
//!
//! ```text
//!  "{\"result\": \"{\\\"disease_name\\\": ...}\", \"status\": true}"
//!        │ parse outer text
//!        ▼
//!  {result: "<json text>", status, server_code}
//!        │ take `result`, parse if string (≤ MAX_UNWRAP_DEPTH times)
//!        ▼
//!  {disease_name, crop_type, recommendations}   ← terminal payload
//!        │ alias lookup + list coercion
//!        ▼
//!  NormalizedDiagnosis
//! ```
//!
//! Decoding is pure: no I/O, no logging, no state between calls.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod aliases;
pub mod coerce;
pub mod export;
mod import;

pub use aliases::{UNKNOWN_CROP, UNKNOWN_DISEASE};

/// Maximum number of `result` layers unwrapped before the shape is rejected.
pub const MAX_UNWRAP_DEPTH: usize = 4;

/// Untyped payload as received from a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEnvelope {
    /// Response body or field still holding serialized JSON.
    Text(String),
    /// Already-decoded structure.
    Value(Value),
}

impl From<&str> for RawEnvelope {
    fn from(text: &str) -> Self {
        RawEnvelope::Text(text.to_string())
    }
}

impl From<String> for RawEnvelope {
    fn from(text: String) -> Self {
        RawEnvelope::Text(text)
    }
}

impl From<Value> for RawEnvelope {
    fn from(value: Value) -> Self {
        RawEnvelope::Value(value)
    }
}

impl From<&Value> for RawEnvelope {
    fn from(value: &Value) -> Self {
        RawEnvelope::Value(value.clone())
    }
}

/// Decoding failure.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The outermost layer was text that is not JSON.
    #[error("malformed JSON in outer envelope: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// No terminal payload could be identified within the unwrap bound.
    #[error("no terminal payload found after {depth} unwrap(s)")]
    UnrecoverableShape { depth: usize },
}

/// Terminal diagnosis payload with every field resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDiagnosis {
    #[serde(alias = "disease_name")]
    pub disease_name: String,

    #[serde(alias = "crop_type")]
    pub crop_type: String,

    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl NormalizedDiagnosis {
    /// Whether the disease name fell back to the sentinel.
    pub fn has_unknown_disease(&self) -> bool {
        self.disease_name == UNKNOWN_DISEASE
    }

    /// Whether the crop type fell back to the sentinel.
    pub fn has_unknown_crop(&self) -> bool {
        self.crop_type == UNKNOWN_CROP
    }
}

/// Decode a diagnosis with the default unwrap bound.
pub fn decode(raw: impl Into<RawEnvelope>) -> Result<NormalizedDiagnosis, DecodeError> {
    decode_with_depth(raw, MAX_UNWRAP_DEPTH)
}

/// Decode a diagnosis, unwrapping at most `max_depth` envelope layers.
pub fn decode_with_depth(
    raw: impl Into<RawEnvelope>,
    max_depth: usize,
) -> Result<NormalizedDiagnosis, DecodeError> {
    let terminal = unwrap_envelope(raw.into(), max_depth, is_diagnosis_terminal)?;
    Ok(normalize(&terminal))
}

fn is_diagnosis_terminal(map: &Map<String, Value>) -> bool {
    aliases::exposes_any(map, aliases::DISEASE_NAME_KEYS)
        || aliases::exposes_any(map, aliases::CROP_TYPE_KEYS)
        || map.contains_key(aliases::RECOMMENDATIONS_KEY)
}

fn normalize(map: &Map<String, Value>) -> NormalizedDiagnosis {
    NormalizedDiagnosis {
        disease_name: aliases::lookup_str(map, aliases::DISEASE_NAME_KEYS)
            .unwrap_or(UNKNOWN_DISEASE)
            .to_string(),
        crop_type: aliases::lookup_str(map, aliases::CROP_TYPE_KEYS)
            .unwrap_or(UNKNOWN_CROP)
            .to_string(),
        recommendations: map
            .get(aliases::RECOMMENDATIONS_KEY)
            .map(|value| coerce::string_list(value, aliases::RECOMMENDATIONS_KEY))
            .unwrap_or_default(),
    }
}

/// Unwrap `result` layers until `is_terminal` accepts a structure.
///
/// The terminal check runs before each unwrap, so a structure exposing both
/// payload fields and `result` is terminal. At most `max_depth` unwraps are
/// performed.
pub(crate) fn unwrap_envelope<F>(
    raw: RawEnvelope,
    max_depth: usize,
    is_terminal: F,
) -> Result<Map<String, Value>, DecodeError>
where
    F: Fn(&Map<String, Value>) -> bool,
{
    let mut current = import::parse_outer(raw)?;
    let mut depth = 0;

    loop {
        let Value::Object(mut map) = current else {
            return Err(DecodeError::UnrecoverableShape { depth });
        };
        if is_terminal(&map) {
            return Ok(map);
        }
        if depth == max_depth {
            return Err(DecodeError::UnrecoverableShape { depth });
        }
        let Some(inner) = map.remove(aliases::RESULT_KEY) else {
            return Err(DecodeError::UnrecoverableShape { depth });
        };
        current = import::parse_inner(inner).ok_or(DecodeError::UnrecoverableShape { depth })?;
        depth += 1;
    }
}
