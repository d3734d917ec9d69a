//! Prediction backend response model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{decode_with_depth, DecodeError, NormalizedDiagnosis, MAX_UNWRAP_DEPTH};
use crate::types::{Error, Result};

/// Body of a `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub crop_type: String,

    /// Classifier label, e.g. `"Black Sigatoka"` or `"No disease, the banana is healthy"`.
    #[serde(default)]
    pub disease: String,

    /// Percentage with two decimals and a trailing `%`, e.g. `"87.50%"`.
    #[serde(default)]
    pub confidence: String,

    /// Forecast report forwarded from the weather API.
    #[serde(default)]
    pub weather: Value,

    /// Diagnosis envelope. The backend spells the key `disease_recomendations`.
    #[serde(
        default,
        rename = "disease_recomendations",
        alias = "disease_recommendations"
    )]
    pub disease_recommendations: Value,
}

impl PredictionResponse {
    /// Confidence as a number in `0.0..=100.0`.
    pub fn confidence_percent(&self) -> Result<f64> {
        parse_confidence(&self.confidence)
    }

    /// Whether the classifier reported a healthy plant.
    pub fn is_healthy(&self) -> bool {
        let label = self.disease.trim().to_ascii_lowercase();
        label.starts_with("no disease") || label == "healthy"
    }

    /// Decode the embedded diagnosis envelope.
    pub fn diagnosis(&self) -> std::result::Result<NormalizedDiagnosis, DecodeError> {
        self.diagnosis_with_depth(MAX_UNWRAP_DEPTH)
    }

    pub fn diagnosis_with_depth(
        &self,
        max_depth: usize,
    ) -> std::result::Result<NormalizedDiagnosis, DecodeError> {
        decode_with_depth(&self.disease_recommendations, max_depth)
    }
}

/// Parse `"87.50%"` (or a bare `"87.5"`) into a percentage.
pub fn parse_confidence(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let value: f64 = number
        .parse()
        .map_err(|_| Error::validation(format!("confidence is not a percentage: {text:?}")))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(Error::validation(format!(
            "confidence out of range: {value}"
        )));
    }
    Ok(value)
}
