//! Envelope export to JSON.
//!
//! Infallible conversion of normalized payloads back to JSON values, used for
//! persistence and for re-feeding results through the decoder.

use serde_json::{json, Value};

use super::{NormalizedDiagnosis, RawEnvelope};

/// Export a diagnosis as a JSON value (camelCase keys).
pub fn to_value(diagnosis: &NormalizedDiagnosis) -> Value {
    json!({
        "diseaseName": diagnosis.disease_name,
        "cropType": diagnosis.crop_type,
        "recommendations": diagnosis.recommendations,
    })
}

/// Export a diagnosis as JSON text.
pub fn to_json(diagnosis: &NormalizedDiagnosis) -> String {
    to_value(diagnosis).to_string()
}

/// Wrap a payload in `depth` string-encoded `result` envelopes, the way the
/// prediction backend nests its responses.
pub fn wrap(payload: Value, depth: usize) -> Value {
    (0..depth).fold(payload, |inner, _| {
        json!({
            "result": inner.to_string(),
            "status": true,
            "server_code": 200,
        })
    })
}

impl From<&NormalizedDiagnosis> for RawEnvelope {
    fn from(diagnosis: &NormalizedDiagnosis) -> Self {
        RawEnvelope::Value(to_value(diagnosis))
    }
}
