//! Configuration management for the district weather service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::DistrictWeatherError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "DISTRICT_WEATHER_CONFIG";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Upper bound for a whole request including every forecast fetch
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

/// Region catalog source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL of the district list
    #[serde(default = "default_catalog_url")]
    pub url: String,
    /// Local district list; takes precedence over `url` when set
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_catalog_timeout")]
    pub timeout_seconds: u32,
}

/// Forecast provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the Open-Meteo API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Per-fetch timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Forecast horizon in days, provider default when unset
    #[serde(default)]
    pub forecast_days: Option<u8>,
    /// Forecast fetches in flight per fan-out
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    /// Deadline for one fan-out; regions still pending are skipped
    #[serde(default = "default_fan_out_timeout")]
    pub fan_out_timeout_seconds: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Number of coldest districts returned
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_request_timeout() -> u32 {
    120
}

fn default_catalog_url() -> String {
    "https://raw.githubusercontent.com/strativ-dev/technical-screening-test/main/bd-districts.json"
        .to_string()
}

fn default_catalog_timeout() -> u32 {
    15
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_max_concurrent_fetches() -> usize {
    8
}

fn default_fan_out_timeout() -> u32 {
    90
}

fn default_user_agent() -> String {
    format!("district-weather/{}", crate::VERSION)
}

fn default_top_n() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            path: None,
            timeout_seconds: default_catalog_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            forecast_days: None,
            max_concurrent_fetches: default_max_concurrent_fetches(),
            fan_out_timeout_seconds: default_fan_out_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.request_timeout_seconds))
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl CatalogConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }

    #[must_use]
    pub fn fan_out_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.fan_out_timeout_seconds))
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. DISTRICT_WEATHER__SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("DISTRICT_WEATHER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.catalog.url.is_empty() {
            self.catalog.url = default_catalog_url();
        }
        if self.catalog.timeout_seconds == 0 {
            self.catalog.timeout_seconds = default_catalog_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.max_concurrent_fetches == 0 {
            self.weather.max_concurrent_fetches = default_max_concurrent_fetches();
        }
        if self.weather.fan_out_timeout_seconds == 0 {
            self.weather.fan_out_timeout_seconds = default_fan_out_timeout();
        }
        if self.weather.user_agent.is_empty() {
            self.weather.user_agent = default_user_agent();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.ranking.top_n == 0 {
            self.ranking.top_n = default_top_n();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                DistrictWeatherError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.catalog.timeout_seconds > 300 {
            return Err(
                DistrictWeatherError::config("Catalog timeout cannot exceed 300 seconds").into(),
            );
        }

        if let Some(days) = self
            .weather
            .forecast_days
            .filter(|days| !(1..=16).contains(days))
        {
            return Err(DistrictWeatherError::config(format!(
                "Forecast days must be between 1 and 16, got: {days}"
            ))
            .into());
        }

        if self.weather.max_concurrent_fetches > 64 {
            return Err(DistrictWeatherError::config(
                "Concurrent forecast fetches cannot exceed 64",
            )
            .into());
        }

        // Travel runs its two fan-outs concurrently after loading the catalog
        let worst_case = u64::from(self.catalog.timeout_seconds)
            + u64::from(self.weather.fan_out_timeout_seconds);
        if u64::from(self.server.request_timeout_seconds) <= worst_case {
            return Err(DistrictWeatherError::config(format!(
                "Request timeout ({}s) must exceed catalog timeout plus fan-out timeout ({worst_case}s)",
                self.server.request_timeout_seconds
            ))
            .into());
        }

        if self.ranking.top_n > 1000 {
            return Err(DistrictWeatherError::config("Ranking size cannot exceed 1000").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DistrictWeatherError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DistrictWeatherError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Weather API base URL", &self.weather.base_url),
            ("Catalog URL", &self.catalog.url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(DistrictWeatherError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
