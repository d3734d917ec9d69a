//! Advisor - composes backend calls, envelope decoding and the session store.
//!
//! Flows:
//! - **diagnose**: validate → upload → decode diagnosis → persist form + result
//! - **advise**: load stored result → prune weather → request advice → decode
//! - **reset**: forget stored state

use tracing::{info, warn};

use crate::advisory::{decode_advisory_with_depth, WeatherAdvisory};
use crate::client::{AdvisoryBackend, AdvisoryRequest, ImageUpload};
use crate::envelope::{NormalizedDiagnosis, MAX_UNWRAP_DEPTH};
use crate::prediction::PredictionResponse;
use crate::store::{image_data_url, FormState, SessionStore};
use crate::types::{Error, Result};
use crate::validation::validate_upload;
use crate::weather::prune_for_advisory;

/// Result of a successful diagnosis.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisOutcome {
    pub response: PredictionResponse,
    pub diagnosis: NormalizedDiagnosis,
    /// `None` when the backend sent an unparseable confidence.
    pub confidence: Option<f64>,
}

/// Advisory service over a backend and a session store.
#[derive(Debug)]
pub struct Advisor<B> {
    backend: B,
    store: SessionStore,
    max_unwrap_depth: usize,
    default_lang: String,
}

impl<B: AdvisoryBackend> Advisor<B> {
    pub fn new(backend: B, store: SessionStore) -> Self {
        Self {
            backend,
            store,
            max_unwrap_depth: MAX_UNWRAP_DEPTH,
            default_lang: "en".to_string(),
        }
    }

    pub fn with_max_unwrap_depth(mut self, depth: usize) -> Self {
        self.max_unwrap_depth = depth;
        self
    }

    pub fn with_default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_lang = lang.into();
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Upload an image, decode the diagnosis and persist the session.
    ///
    /// Nothing is persisted when the call or the decode fails.
    pub async fn diagnose(&self, mut upload: ImageUpload) -> Result<DiagnosisOutcome> {
        upload.crop = validate_upload(&upload.file_name, &upload.location, &upload.crop)?;

        let response = self.backend.predict(&upload).await?;
        let diagnosis = response.diagnosis_with_depth(self.max_unwrap_depth)?;
        let confidence = match response.confidence_percent() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(confidence = %response.confidence, error = %e, "Ignoring bad confidence");
                None
            }
        };

        let state = FormState {
            location: upload.location.clone(),
            crop: upload.crop.clone(),
            image: Some(image_data_url(upload.mime(), &upload.bytes)),
            result: Some(response.clone()),
            saved_at: None,
        };
        self.store.save(&state)?;

        info!(
            disease = %diagnosis.disease_name,
            crop = %diagnosis.crop_type,
            recommendations = diagnosis.recommendations.len(),
            healthy = response.is_healthy(),
            "Diagnosis complete"
        );
        Ok(DiagnosisOutcome {
            response,
            diagnosis,
            confidence,
        })
    }

    /// Request weather advice for the stored prediction.
    pub async fn advise(&self, lang: Option<&str>) -> Result<WeatherAdvisory> {
        let state = self.store.load()?;
        let result = state
            .result
            .ok_or_else(|| Error::not_found("no stored prediction; run a diagnosis first"))?;

        let crop = if result.crop_type.is_empty() {
            state.crop
        } else {
            result.crop_type.clone()
        };
        let request = AdvisoryRequest {
            weather_data: prune_for_advisory(&result.weather),
            crop,
            lang: lang.unwrap_or(&self.default_lang).to_string(),
        };

        let response = self.backend.recommendations(&request).await?;
        let advisory =
            decode_advisory_with_depth(&response.recommendations, self.max_unwrap_depth)?;
        info!(
            crop = %request.crop,
            risks = advisory.risks.len(),
            recommendations = advisory.recommendations.len(),
            "Advisory complete"
        );
        Ok(advisory)
    }

    /// Saved form state and, when a result exists, its decoded diagnosis.
    pub fn current(&self) -> Result<(FormState, Option<NormalizedDiagnosis>)> {
        let state = self.store.load()?;
        let diagnosis = match &state.result {
            Some(result) => Some(result.diagnosis_with_depth(self.max_unwrap_depth)?),
            None => None,
        };
        Ok((state, diagnosis))
    }

    /// Clear the stored session.
    pub fn reset(&self) -> Result<()> {
        self.store.reset()
    }
}
