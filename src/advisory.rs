//! Weather advisory decoding.
//!
//! The `/recommendations` endpoint answers `{crop, recommendations}` where
//! `recommendations` holds an envelope (usually as text) whose terminal
//! payload is `{risks: [...], recommendations: [...]}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::envelope::aliases::{RECOMMENDATIONS_KEY, RISKS_KEY};
use crate::envelope::coerce::string_list;
use crate::envelope::{unwrap_envelope, DecodeError, RawEnvelope, MAX_UNWRAP_DEPTH};

/// Weather-driven crop risks and mitigation actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherAdvisory {
    #[serde(default)]
    pub risks: Vec<String>,

    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl WeatherAdvisory {
    pub fn is_empty(&self) -> bool {
        self.risks.is_empty() && self.recommendations.is_empty()
    }
}

/// Body of a `/recommendations` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    #[serde(default)]
    pub crop: String,

    /// Still-encoded advisory envelope.
    #[serde(default)]
    pub recommendations: Value,
}

impl AdvisoryResponse {
    /// Decode the embedded advisory envelope.
    pub fn advisory(&self) -> Result<WeatherAdvisory, DecodeError> {
        decode_advisory(&self.recommendations)
    }
}

/// Decode an advisory envelope with the default unwrap bound.
pub fn decode_advisory(raw: impl Into<RawEnvelope>) -> Result<WeatherAdvisory, DecodeError> {
    decode_advisory_with_depth(raw, MAX_UNWRAP_DEPTH)
}

/// Decode an advisory envelope, unwrapping at most `max_depth` layers.
pub fn decode_advisory_with_depth(
    raw: impl Into<RawEnvelope>,
    max_depth: usize,
) -> Result<WeatherAdvisory, DecodeError> {
    let terminal = unwrap_envelope(raw.into(), max_depth, is_advisory_terminal)?;
    Ok(WeatherAdvisory {
        risks: list_field(&terminal, RISKS_KEY),
        recommendations: list_field(&terminal, RECOMMENDATIONS_KEY),
    })
}

fn is_advisory_terminal(map: &Map<String, Value>) -> bool {
    map.contains_key(RISKS_KEY) || map.contains_key(RECOMMENDATIONS_KEY)
}

fn list_field(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .map(|value| string_list(value, key))
        .unwrap_or_default()
}
