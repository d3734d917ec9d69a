//! Prediction backend client.
//!
//! The backend exposes two multipart endpoints:
//! - `POST /predict` with `image`, `location`, `crop` → `PredictionResponse`
//! - `POST /recommendations` with `weather_data`, `crop`, `lang` → `AdvisoryResponse`
//!
//! Responses are returned as received; envelope decoding is left to callers.
//! No retries are attempted here.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::advisory::AdvisoryResponse;
use crate::prediction::PredictionResponse;
use crate::types::{BackendConfig, Error, Result};
use crate::validation::image_mime;

/// Image upload form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub location: String,
    pub crop: String,
}

impl ImageUpload {
    /// Read an image from disk.
    pub fn from_path(path: &Path, location: &str, crop: &str) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::validation(format!("{} has no file name", path.display())))?
            .to_string();
        Ok(Self {
            file_name,
            bytes,
            location: location.to_string(),
            crop: crop.to_string(),
        })
    }

    pub fn mime(&self) -> &'static str {
        image_mime(&self.file_name)
    }
}

/// Weather advisory request form.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryRequest {
    /// Pruned forecast, sent as JSON text.
    pub weather_data: Value,
    pub crop: String,
    pub lang: String,
}

/// Backend operations used by the advisor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdvisoryBackend: Send + Sync {
    /// Upload an image for disease prediction.
    async fn predict(&self, upload: &ImageUpload) -> Result<PredictionResponse>;

    /// Ask for weather-based crop risk advice.
    async fn recommendations(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse>;
}

/// HTTP implementation of `AdvisoryBackend`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("agro-advisor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_form(&self, path: &str, form: Form) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        let started = Instant::now();
        let response = self.http_client.post(&url).multipart(form).send().await?;
        let status = response.status();
        info!(
            url = %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Backend call completed"
        );

        if status.is_success() {
            return Ok(response);
        }
        let body = error_body(response, &url).await;
        warn!(url = %url, status = status.as_u16(), "Backend call failed");
        Err(Error::upstream(status.as_u16(), error_message(&body)))
    }
}

#[async_trait]
impl AdvisoryBackend for HttpBackend {
    async fn predict(&self, upload: &ImageUpload) -> Result<PredictionResponse> {
        debug!(
            file_name = %upload.file_name,
            bytes = upload.bytes.len(),
            location = %upload.location,
            crop = %upload.crop,
            "Uploading image for prediction"
        );
        let image = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(upload.mime())?;
        let form = Form::new()
            .part("image", image)
            .text("location", upload.location.clone())
            .text("crop", upload.crop.clone());

        let response = self.post_form("predict", form).await?;
        Ok(response.json().await?)
    }

    async fn recommendations(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse> {
        let weather_json = serde_json::to_string(&request.weather_data)?;
        debug!(
            crop = %request.crop,
            lang = %request.lang,
            weather_bytes = weather_json.len(),
            "Requesting weather advisory"
        );
        let form = Form::new()
            .text("weather_data", weather_json)
            .text("crop", request.crop.clone())
            .text("lang", request.lang.clone());

        let response = self.post_form("recommendations", form).await?;
        Ok(response.json().await?)
    }
}

/// Read the body of a failed response; a read failure is logged and yields "".
pub(crate) async fn error_body(response: reqwest::Response, url: &str) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(url = %url, error = %e, "Failed to read error body");
            String::new()
        }
    }
}

/// Extract `{"error": "..."}` from a backend error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| body.trim().to_string())
}
