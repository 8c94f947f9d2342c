//! Remote temperature lookup.
//!
//! # Responsibility
//! - Query the weather endpoint for one coordinate in metric units.
//! - Consume only `main.temp` from the response body.
//!
//! # Invariants
//! - No request is sent without an API key.
//! - Requests are bounded by the configured timeout.
//! - Coordinates and the API key are never logged.

use crate::config::WeatherConfig;
use crate::model::environment::Coordinate;
use async_trait::async_trait;
use log::{info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type WeatherResult<T> = Result<T, WeatherError>;

#[derive(Debug)]
pub enum WeatherError {
    MissingApiKey,
    Transport(reqwest::Error),
    Status(u16),
    MalformedResponse(String),
}

impl Display for WeatherError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "weather api key is not configured"),
            Self::Transport(err) => write!(f, "weather request failed: {err}"),
            Self::Status(code) => write!(f, "weather endpoint returned http {code}"),
            Self::MalformedResponse(message) => {
                write!(f, "weather response is malformed: {message}")
            }
        }
    }
}

impl Error for WeatherError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::MissingApiKey | Self::Status(_) | Self::MalformedResponse(_) => None,
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Temperature source used by the environment screen.
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current temperature in degrees Celsius at `coordinate`.
    async fn current_temperature(&self, coordinate: Coordinate) -> WeatherResult<f64>;
}

/// HTTP client for an OpenWeatherMap-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> WeatherResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn current_temperature(&self, coordinate: Coordinate) -> WeatherResult<f64> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(WeatherError::MissingApiKey)?;

        let started_at = Instant::now();
        let response = self
            .http
            .get(self.config.base_url.as_str())
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("units", "metric".to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "event=weather_fetch module=weather status=error http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let temperature = parse_temperature(&body)?;
        info!(
            "event=weather_fetch module=weather status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(temperature)
    }
}

#[derive(Debug, Deserialize)]
struct WeatherBody {
    main: MainBlock,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

/// Extracts `main.temp` from a weather response body.
pub fn parse_temperature(body: &str) -> WeatherResult<f64> {
    serde_json::from_str::<WeatherBody>(body)
        .map(|parsed| parsed.main.temp)
        .map_err(|err| WeatherError::MalformedResponse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_temperature, WeatherError};

    #[test]
    fn parses_main_temp_and_ignores_other_fields() {
        let body = r#"{"coord":{"lon":13.4,"lat":52.52},"main":{"temp":18.25,"humidity":40},"name":"Berlin"}"#;
        assert_eq!(parse_temperature(body).expect("temperature"), 18.25);
    }

    #[test]
    fn accepts_integer_temperatures() {
        assert_eq!(parse_temperature(r#"{"main":{"temp":-3}}"#).expect("int temp"), -3.0);
    }

    #[test]
    fn rejects_missing_or_non_numeric_temp() {
        for body in [
            r#"{"main":{}}"#,
            r#"{"main":{"temp":"warm"}}"#,
            r#"{"cod":401,"message":"Invalid API key"}"#,
            "not json",
        ] {
            let err = parse_temperature(body).expect_err("malformed body");
            assert!(matches!(err, WeatherError::MalformedResponse(_)), "{body}");
        }
    }
}
