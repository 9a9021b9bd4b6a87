//! Open-Meteo hourly temperature client
//!
//! Requests `temperature_2m` with `timezone=auto`, so returned timestamps are
//! already in the region's local time.

use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::ForecastProvider;
use crate::config::WeatherConfig;
use crate::models::HourlyForecastSeries;
use crate::{DistrictWeatherError, Result};

/// Hourly forecast response from `OpenMeteo`
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyData,
}

/// Hourly weather data from `OpenMeteo`
#[derive(Debug, Deserialize)]
struct HourlyData {
    time: Vec<String>,
    #[serde(rename = "temperature_2m")]
    temperature: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    forecast_days: Option<u8>,
}

impl OpenMeteoClient {
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            forecast_days: None,
        }
    }

    /// Build a client with its own timeout and user agent from configuration
    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DistrictWeatherError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::new(client, config.base_url.as_str()).with_forecast_days(config.forecast_days))
    }

    #[must_use]
    pub fn with_forecast_days(mut self, forecast_days: Option<u8>) -> Self {
        self.forecast_days = forecast_days;
        self
    }

    fn forecast_url(&self, latitude: f64, longitude: f64) -> String {
        let mut url = format!(
            "{}/forecast?latitude={}&longitude={}&hourly=temperature_2m&timezone=auto",
            self.base_url, latitude, longitude
        );
        if let Some(days) = self.forecast_days {
            url.push_str(&format!("&forecast_days={days}"));
        }
        url
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<HourlyForecastSeries> {
        let start_time = Instant::now();
        let fail = |message: String| DistrictWeatherError::forecast_fetch(latitude, longitude, message);

        let response = self
            .client
            .get(self.forecast_url(latitude, longitude))
            .send()
            .await
            .map_err(|e| fail(format!("Network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Forecast request returned HTTP {}", status);
            return Err(fail(format!(
                "API request failed with status: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let forecast_response: ForecastResponse = response
            .json()
            .await
            .map_err(|e| fail(format!("Invalid forecast data received from OpenMeteo API: {e}")))?;

        let series = to_series(forecast_response.hourly).map_err(fail)?;

        debug!(
            "Retrieved {} hourly samples in {:.3}s",
            series.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(series)
    }
}

/// Convert the provider arrays into an aligned series, dropping `null` temperatures
fn to_series(hourly: HourlyData) -> std::result::Result<HourlyForecastSeries, String> {
    if hourly.time.len() != hourly.temperature.len() {
        return Err(format!(
            "Hourly arrays are not aligned: {} timestamps, {} temperatures",
            hourly.time.len(),
            hourly.temperature.len()
        ));
    }

    let mut samples = Vec::with_capacity(hourly.time.len());
    for (time, temperature) in hourly.time.iter().zip(hourly.temperature) {
        let timestamp = parse_local_time(time)?;
        if let Some(temperature) = temperature {
            samples.push((timestamp, temperature));
        }
    }

    Ok(HourlyForecastSeries::from_samples(samples))
}

fn parse_local_time(value: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| value.parse::<NaiveDateTime>())
        .map_err(|_| format!("Invalid timestamp: {value}"))
}
