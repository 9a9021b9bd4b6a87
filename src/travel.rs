//! Temperature based travel recommendations
//!
//! A trip is recommended when the destination is cooler than the origin at
//! the reference hour on the travel date.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::aggregation::AggregationEngine;
use crate::catalog::CatalogSource;
use crate::models::{TravelRecommendation, find_by_name};
use crate::{DistrictWeatherError, Result};

/// A traveler's question: should I go from `origin` to `destination` on `travel_date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRequest {
    pub origin: String,
    pub destination: String,
    pub travel_date: NaiveDate,
}

impl TravelRequest {
    #[must_use]
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        travel_date: NaiveDate,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            travel_date,
        }
    }

    /// Shape checks that need neither the catalog nor the provider
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(DistrictWeatherError::validation(
                "Origin and destination cannot be empty",
            ));
        }

        if self.travel_date < today {
            return Err(DistrictWeatherError::validation(format!(
                "Invalid travel date {}: must not be before {today}",
                self.travel_date
            )));
        }

        Ok(())
    }
}

/// Compares origin and destination temperatures on a travel date
#[derive(Clone)]
pub struct TravelRecommendationService {
    catalog: Arc<dyn CatalogSource>,
    engine: AggregationEngine,
}

impl TravelRecommendationService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogSource>, engine: AggregationEngine) -> Self {
        Self { catalog, engine }
    }

    /// Recommend or advise against the trip in `request`
    ///
    /// `today` is the caller's current local date; travel dates before it are
    /// rejected without loading the catalog.
    #[instrument(skip(self), fields(origin = %request.origin, destination = %request.destination))]
    pub async fn recommend(
        &self,
        request: &TravelRequest,
        today: NaiveDate,
    ) -> Result<TravelRecommendation> {
        request.validate(today)?;

        let regions = self.catalog.load().await?;

        let resolve = |name: &str| {
            find_by_name(&regions, name)
                .map(|region| region.id)
                .ok_or_else(|| {
                    DistrictWeatherError::validation(format!("Invalid district name: {name}"))
                })
        };
        let origin_id = resolve(request.origin.as_str())?;
        let destination_id = resolve(request.destination.as_str())?;

        let (origin, destination) = tokio::join!(
            self.engine.aggregate_one(origin_id, request.travel_date, &regions),
            self.engine.aggregate_one(destination_id, request.travel_date, &regions),
        );

        let no_forecast = |name: &str| {
            DistrictWeatherError::validation(format!(
                "No forecast available for {name} on {}",
                request.travel_date
            ))
        };
        let (origin, destination) = match (origin, destination) {
            (Some(origin), Some(destination)) => (origin, destination),
            (None, _) => return Err(no_forecast(request.origin.as_str())),
            (_, None) => return Err(no_forecast(request.destination.as_str())),
        };

        let recommendation = TravelRecommendation::new(origin.celsius(), destination.celsius());
        info!(
            "{} {} -> {} {}: {:?}",
            origin.region.name,
            origin.temperature.format_temperature(),
            destination.region.name,
            destination.temperature.format_temperature(),
            recommendation.verdict
        );

        Ok(recommendation)
    }
}
