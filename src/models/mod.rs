//! Data models for the district weather service
//!
//! This module contains the core domain models organized by concern:
//! - Region: catalog districts and name lookup
//! - Forecast: hourly temperature series from the provider
//! - Observation: reduced per-region temperatures and travel verdicts

pub mod forecast;
pub mod observation;
pub mod region;

// Re-export all public types for convenient access
pub use forecast::HourlyForecastSeries;
pub use observation::{
    RegionTemperatureObservation, RepresentativeTemperature, TravelRecommendation, Verdict,
};
pub use region::{Region, find_by_name};
