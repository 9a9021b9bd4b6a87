//! Coldest-district ranking

use std::sync::Arc;

use tracing::{info, instrument};

use crate::Result;
use crate::aggregation::AggregationEngine;
use crate::catalog::CatalogSource;
use crate::models::RegionTemperatureObservation;

/// Answers "which districts are coldest right now"
#[derive(Clone)]
pub struct RankingService {
    catalog: Arc<dyn CatalogSource>,
    engine: AggregationEngine,
    top_n: usize,
}

impl RankingService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogSource>, engine: AggregationEngine, top_n: usize) -> Self {
        Self {
            catalog,
            engine,
            top_n,
        }
    }

    /// Load the catalog, aggregate every district and keep the `top_n` coldest
    ///
    /// Only a catalog failure is an error; districts whose forecast fails are left out.
    #[instrument(skip(self))]
    pub async fn coolest_districts(&self) -> Result<Vec<RegionTemperatureObservation>> {
        let regions = self.catalog.load().await?;
        let observations = self.engine.aggregate_all(&regions).await;
        let ranked = top_coldest(observations, self.top_n);
        info!(
            "Ranked {} coolest of {} districts",
            ranked.len(),
            regions.len()
        );
        Ok(ranked)
    }
}

/// The `n` coldest observations, ascending by temperature
///
/// The sort is stable, so equal temperatures keep their input order.
#[must_use]
pub fn top_coldest(
    mut observations: Vec<RegionTemperatureObservation>,
    n: usize,
) -> Vec<RegionTemperatureObservation> {
    observations.sort_by(|a, b| a.celsius().total_cmp(&b.celsius()));
    observations.truncate(n);
    observations
}
