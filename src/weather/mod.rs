use async_trait::async_trait;

use crate::Result;
use crate::models::HourlyForecastSeries;

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Source of hourly temperature forecasts keyed by coordinates
///
/// Implementations perform exactly one attempt per call and report failure as
/// `DistrictWeatherError::ForecastFetch`.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<HourlyForecastSeries>;
}
