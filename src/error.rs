//! Error types and handling for the district weather service

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the district weather service
#[derive(Error, Debug)]
pub enum DistrictWeatherError {
    /// The region catalog could not be retrieved
    #[error("Catalog fetch error: {message}")]
    CatalogFetch { message: String },

    /// The region catalog was retrieved but is not a valid district list
    #[error("Catalog parse error: {message}")]
    CatalogParse { message: String },

    /// A single region's forecast could not be retrieved or parsed
    #[error("Forecast fetch error at ({latitude}, {longitude}): {message}")]
    ForecastFetch {
        latitude: f64,
        longitude: f64,
        message: String,
    },

    /// No reference-hour sample exists in the forecast horizon
    #[error("No matching reference-hour sample{}", date_suffix(.date))]
    NoMatchingSample { date: Option<NaiveDate> },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

fn date_suffix(date: &Option<NaiveDate>) -> String {
    date.map(|d| format!(" for {d}")).unwrap_or_default()
}

impl DistrictWeatherError {
    /// Create a new catalog fetch error
    pub fn catalog_fetch<S: Into<String>>(message: S) -> Self {
        Self::CatalogFetch {
            message: message.into(),
        }
    }

    /// Create a new catalog parse error
    pub fn catalog_parse<S: Into<String>>(message: S) -> Self {
        Self::CatalogParse {
            message: message.into(),
        }
    }

    /// Create a new forecast fetch error carrying the requested coordinates
    pub fn forecast_fetch<S: Into<String>>(latitude: f64, longitude: f64, message: S) -> Self {
        Self::ForecastFetch {
            latitude,
            longitude,
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller's request rather than a collaborator
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::CatalogFetch { .. } | Self::CatalogParse { .. } => {
                "Failed to fetch the district list. Please try again later.".to_string()
            }
            Self::ForecastFetch { .. } => {
                "Unable to connect to the forecast provider. Please try again later.".to_string()
            }
            Self::NoMatchingSample { .. } => {
                "No forecast is available for the requested date.".to_string()
            }
            Self::Validation { message } => format!("Invalid input: {message}"),
            Self::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            Self::Io { .. } => "File operation failed. Please check file permissions.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let catalog_err = DistrictWeatherError::catalog_fetch("404");
        assert!(matches!(catalog_err, DistrictWeatherError::CatalogFetch { .. }));

        let validation_err = DistrictWeatherError::validation("empty origin");
        assert!(validation_err.is_validation());

        let forecast_err = DistrictWeatherError::forecast_fetch(23.7, 90.4, "timeout");
        assert!(!forecast_err.is_validation());
        assert!(forecast_err.to_string().contains("23.7"));
    }

    #[test]
    fn test_no_matching_sample_display() {
        let with_date = DistrictWeatherError::NoMatchingSample {
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
        };
        assert_eq!(
            with_date.to_string(),
            "No matching reference-hour sample for 2024-03-01"
        );

        let without_date = DistrictWeatherError::NoMatchingSample { date: None };
        assert_eq!(without_date.to_string(), "No matching reference-hour sample");
    }

    #[test]
    fn test_user_messages() {
        let validation_err = DistrictWeatherError::validation("Invalid travel date");
        assert!(validation_err.user_message().contains("Invalid travel date"));

        let catalog_err = DistrictWeatherError::catalog_parse("missing field `districts`");
        assert!(catalog_err.user_message().contains("district list"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DistrictWeatherError = io_err.into();
        assert!(matches!(err, DistrictWeatherError::Io { .. }));
    }
}
