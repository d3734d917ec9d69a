//! Configuration structures.
//!
//! Configuration is loaded from an optional JSON file, then overridden by
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::errors::{Error, Result};
use crate::envelope::MAX_UNWRAP_DEPTH;

/// Global client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Prediction backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Public weather API configuration.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Persisted form state.
    #[serde(default)]
    pub store: StoreConfig,

    /// Envelope decoding limits.
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Prediction backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL serving `/predict` and `/recommendations`.
    pub base_url: String,

    /// Per-request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Language code sent with advisory requests when none is given.
    pub default_lang: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(60),
            default_lang: "en".to_string(),
        }
    }
}

/// Weather API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL of the forecast API (without the `/forecast.json` suffix).
    pub base_url: String,

    /// API key; the weather command is unavailable without one.
    pub api_key: Option<String>,

    /// Number of forecast days to request.
    pub forecast_days: u8,

    /// Per-request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.weatherapi.com/v1".to_string(),
            api_key: None,
            forecast_days: 3,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Session store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON file holding the persisted form state.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".agro-advisor/session.json"),
        }
    }
}

/// Envelope decoding limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum number of `result` layers unwrapped before giving up.
    pub max_unwrap_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_unwrap_depth: MAX_UNWRAP_DEPTH,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Config {
    /// Load configuration from an optional JSON file, then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read configuration from a JSON file. Missing sections take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config {}: {e}", path.display()))
        })?;
        let config = serde_json::from_str(&text).map_err(|e| {
            Error::config(format!("invalid config {}: {e}", path.display()))
        })?;
        Ok(config)
    }

    /// Apply `AGRO_*` overrides using the given variable lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("AGRO_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(url) = lookup("AGRO_WEATHER_URL") {
            self.weather.base_url = url;
        }
        if let Some(key) = lookup("AGRO_WEATHER_API_KEY") {
            self.weather.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(path) = lookup("AGRO_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }
        if let Some(depth) = lookup("AGRO_MAX_UNWRAP_DEPTH") {
            self.decoder.max_unwrap_depth = depth.parse().map_err(|_| {
                Error::config(format!("AGRO_MAX_UNWRAP_DEPTH must be an integer, got {depth:?}"))
            })?;
        }
        Ok(())
    }
}
