//! Persisted form state.
//!
//! Keeps the last location, crop, image and prediction result between runs,
//! the way the web form kept them in browser storage. State lives in a single
//! JSON file, written through a sibling temp file and a rename.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::prediction::PredictionResponse;
use crate::types::{Error, Result};

/// Form fields and last result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub crop: String,

    /// Uploaded image as a `data:` URL.
    #[serde(default, rename = "base64Image", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PredictionResponse>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl FormState {
    /// A result has been received since the last reset.
    pub fn submitted(&self) -> bool {
        self.result.is_some()
    }
}

/// File-backed store for `FormState`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved state; a missing file yields the empty state.
    pub fn load(&self) -> Result<FormState> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved session");
                return Ok(FormState::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// Persist `state`, stamping `saved_at`.
    pub fn save(&self, state: &FormState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut stamped = state.clone();
        stamped.saved_at = Some(Utc::now());

        let bytes = serde_json::to_vec_pretty(&stamped)?;
        let tmp = self.tmp_path();
        let written = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            warn!(path = %self.path.display(), error = %e, "Session save failed");
            return Err(e.into());
        }
        debug!(
            path = %self.path.display(),
            submitted = stamped.submitted(),
            "Session saved"
        );
        Ok(())
    }

    /// Forget everything; a missing file is not an error.
    pub fn reset(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Session reset");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Encode image bytes as a `data:<mime>;base64,...` URL.
pub fn image_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a `data:` URL back into its MIME type and bytes.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::validation("not a data URL"))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| Error::validation("data URL is not base64-encoded"))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::validation(format!("invalid base64 image: {e}")))?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    fn sample_result() -> PredictionResponse {
        serde_json::from_value(json!({
            "crop_type": "tomato",
            "disease": "Late blight",
            "confidence": "76.00%",
            "weather": {},
            "disease_recomendations": "{\"result\": \"{}\"}",
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("nested/session.json"));
        let state = store.load().unwrap();
        assert_eq!(state, FormState::default());
        assert!(!state.submitted());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("nested/session.json"));
        let state = FormState {
            location: "Galle".to_string(),
            crop: "tomato".to_string(),
            image: Some(image_data_url("image/png", b"\x89PNG")),
            result: Some(sample_result()),
            saved_at: None,
        };
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.saved_at.is_some());
        assert!(loaded.submitted());
        assert_eq!(loaded.location, "Galle");
        assert_eq!(loaded.result, state.result);
        assert!(!dir.path().join("nested/session.json.tmp").exists());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        // A non-empty directory in the way makes the rename fail.
        std::fs::create_dir_all(path.join("occupied")).unwrap();
        let store = SessionStore::open(&path);

        let err = store.save(&FormState::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!dir.path().join("session.json.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_uses_browser_storage_key_names() {
        let state = FormState {
            image: Some("data:image/gif;base64,R0lG".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&state).unwrap();
        assert!(value.get("base64Image").is_some());
        assert!(value.get("result").is_none());
    }

    #[traced_test]
    #[test]
    fn test_reset_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        store.save(&FormState::default()).unwrap();
        assert!(store.path().exists());

        store.reset().unwrap();
        assert!(!store.path().exists());
        assert!(logs_contain("Session reset"));
        store.reset().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = SessionStore::open(&path).load().unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_data_url_round_trip() {
        let url = image_data_url("image/jpeg", &[1, 2, 3, 250]);
        assert!(url.starts_with("data:image/jpeg;base64,"));
        let (mime, bytes) = parse_data_url(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, vec![1, 2, 3, 250]);
        assert!(parse_data_url("http://x").is_err());
        assert!(parse_data_url("data:image/png,raw").is_err());
    }
}
