//! District weather - coolest districts and temperature based travel advice
//!
//! This library loads a district catalog, fetches hourly forecasts for every
//! district, reduces each series to a 2 PM representative temperature and
//! answers two questions: which districts are coolest, and whether a trip from
//! one district to another is recommended on a given date.

pub mod aggregation;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod ranking;
pub mod reducer;
pub mod travel;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use aggregation::{AggregationEngine, AggregationReport, RegionOutcome, SkipReason};
pub use catalog::{CatalogSource, FileCatalogSource, HttpCatalogSource, parse_catalog};
pub use config::AppConfig;
pub use error::DistrictWeatherError;
pub use models::{
    HourlyForecastSeries, Region, RegionTemperatureObservation, RepresentativeTemperature,
    TravelRecommendation, Verdict,
};
pub use ranking::{RankingService, top_coldest};
pub use reducer::{REFERENCE_HOUR, ReductionStrategy};
pub use travel::{TravelRecommendationService, TravelRequest};
pub use weather::{ForecastProvider, OpenMeteoClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DistrictWeatherError>;
