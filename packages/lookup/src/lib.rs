#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! OpenWeatherMap current-weather lookup client.
//!
//! One authenticated GET per lookup against the current-weather-by-
//! coordinates endpoint, metric units. No retry and no internal timeout:
//! retry policy (there is none) and deadlines belong to the caller.
//!
//! See <https://openweathermap.org/current>

use async_trait::async_trait;
use thiserror::Error;

/// Default OpenWeatherMap current-weather endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Environment variable holding the OpenWeatherMap API key.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Environment variable overriding the weather endpoint URL.
pub const BASE_URL_ENV: &str = "WEATHER_API_URL";

/// Errors from a single temperature lookup.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not contain the expected temperature field.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// No API key was configured.
    #[error("Missing OpenWeatherMap API key (set {API_KEY_ENV})")]
    MissingApiKey,
}

/// A single-lookup weather source.
///
/// The seam between the enrichment pipeline and the network: production
/// uses [`OpenWeatherClient`], tests substitute an in-memory stub.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    /// Resolves the current temperature (degrees Celsius) at the given
    /// coordinates.
    ///
    /// Coordinates are passed as the verbatim text from the upload; the
    /// provider parses them on its side.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError`] on network failure, non-success status, or
    /// a response body missing the temperature field.
    async fn current_temperature(&self, latitude: &str, longitude: &str)
    -> Result<f64, WeatherError>;
}

/// Configuration for the OpenWeatherMap client.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// API key (`appid` query parameter).
    pub api_key: String,
    /// Endpoint URL; defaults to [`DEFAULT_BASE_URL`].
    pub base_url: String,
}

impl WeatherConfig {
    /// Creates a configuration with the default endpoint.
    #[must_use]
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Overrides the endpoint URL (self-hosted proxies, tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_owned();
        self
    }

    /// Reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::MissingApiKey`] if `WEATHER_API_KEY` is
    /// unset or empty.
    pub fn from_env() -> Result<Self, WeatherError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(WeatherError::MissingApiKey)?;

        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());

        Ok(Self { api_key, base_url })
    }
}

/// OpenWeatherMap HTTP client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    /// Creates a client with a fresh connection pool.
    #[must_use]
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn current_temperature(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<f64, WeatherError> {
        if self.config.api_key.is_empty() {
            return Err(WeatherError::MissingApiKey);
        }

        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("appid", self.config.api_key.as_str()),
                ("lat", latitude),
                ("lon", longitude),
                ("units", "metric"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;
        let temperature = parse_response(&body)?;

        log::debug!("Weather at ({latitude}, {longitude}): {temperature}°C");
        Ok(temperature)
    }
}

/// Extracts the metric temperature from an OpenWeatherMap response body.
fn parse_response(body: &serde_json::Value) -> Result<f64, WeatherError> {
    body["main"]["temp"]
        .as_f64()
        .ok_or_else(|| WeatherError::Parse {
            message: "Missing main.temp in weather response".to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_weather() {
        let body = serde_json::json!({
            "coord": { "lon": -74.0, "lat": 40.7 },
            "main": { "temp": 15.0, "feels_like": 14.2, "humidity": 61 },
            "name": "New York"
        });
        let temp = parse_response(&body).unwrap();
        assert!((temp - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_missing_temperature() {
        let body = serde_json::json!({ "main": { "humidity": 61 } });
        assert!(matches!(
            parse_response(&body),
            Err(WeatherError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_non_object_body() {
        let body = serde_json::json!("Invalid API key");
        assert!(matches!(
            parse_response(&body),
            Err(WeatherError::Parse { .. })
        ));
    }
}
