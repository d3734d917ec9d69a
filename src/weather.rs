//! Weather forecast access and advisory preparation.
//!
//! Forecasts come from a weatherapi.com-style `forecast.json` endpoint. Before
//! a forecast is sent to the advisory backend, bulky fields the model does not
//! need (current conditions, hourly rows, condition icons) are stripped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::error_body;
use crate::types::{Error, Result, WeatherConfig};

/// Forecast report as forwarded by the prediction backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub location: Value,

    #[serde(default)]
    pub current: Value,

    #[serde(default)]
    pub forecast: Value,
}

impl WeatherReport {
    /// Location display name, if the API provided one.
    pub fn location_name(&self) -> Option<&str> {
        self.location.get("name").and_then(Value::as_str)
    }

    /// Number of forecast days present.
    pub fn forecast_days(&self) -> usize {
        self.forecast
            .get("forecastday")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// Copy of `weather` without `current`, and without `hour` and
/// `day.condition` on every forecast day.
pub fn prune_for_advisory(weather: &Value) -> Value {
    let mut pruned = weather.clone();
    if let Some(root) = pruned.as_object_mut() {
        root.remove("current");

        let days = root
            .get_mut("forecast")
            .and_then(|f| f.get_mut("forecastday"))
            .and_then(Value::as_array_mut);
        for day in days.into_iter().flatten() {
            let Some(day) = day.as_object_mut() else {
                continue;
            };
            day.remove("hour");
            if let Some(summary) = day.get_mut("day").and_then(Value::as_object_mut) {
                summary.remove("condition");
            }
        }
    }
    pruned
}

/// Client for the public forecast API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    config: WeatherConfig,
    http_client: reqwest::Client,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("agro-advisor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetch a forecast for a free-text location.
    pub async fn forecast(&self, location: &str) -> Result<WeatherReport> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::config("weather API key is not configured"))?;
        if location.trim().is_empty() {
            return Err(Error::validation("location cannot be empty"));
        }

        let url = format!("{}/forecast.json", self.config.base_url.trim_end_matches('/'));
        let days = self.config.forecast_days.to_string();
        debug!(url = %url, location = %location, days = %days, "Fetching forecast");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("key", api_key),
                ("q", location),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response, &url).await;
            warn!(status = %status, location = %location, "Forecast request failed");
            return Err(Error::upstream(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }
}
