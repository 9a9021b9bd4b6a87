//! Fan-out of forecast fetches across regions
//!
//! Both entry points share one fetch-then-reduce pipeline parametrised by a
//! [`ReductionStrategy`]. Per-region failures never abort a fan-out; they are
//! recorded as a [`SkipReason`] and left out of the public results.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, instrument, warn};

use crate::DistrictWeatherError;
use crate::models::{Region, RegionTemperatureObservation};
use crate::reducer::ReductionStrategy;
use crate::weather::ForecastProvider;

/// Why a region produced no observation
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Transport, status or parse failure at the provider
    FetchFailed(String),
    /// The series had no reference-hour sample for the strategy
    NoMatchingSample,
    /// The fan-out deadline passed before this region was observed
    DeadlineExceeded,
}

/// Result of fetching and reducing one region
#[derive(Debug, Clone, PartialEq)]
pub enum RegionOutcome {
    Observed(RegionTemperatureObservation),
    Skipped { region: Region, reason: SkipReason },
}

impl RegionOutcome {
    #[must_use]
    pub fn region(&self) -> &Region {
        match self {
            Self::Observed(observation) => &observation.region,
            Self::Skipped { region, .. } => region,
        }
    }

    #[must_use]
    pub fn observation(&self) -> Option<&RegionTemperatureObservation> {
        match self {
            Self::Observed(observation) => Some(observation),
            Self::Skipped { .. } => None,
        }
    }
}

/// Every region's outcome from one fan-out, in input order
#[derive(Debug, Clone, Default)]
pub struct AggregationReport {
    pub outcomes: Vec<RegionOutcome>,
}

impl AggregationReport {
    /// Successful observations in input order
    #[must_use]
    pub fn into_observations(self) -> Vec<RegionTemperatureObservation> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                RegionOutcome::Observed(observation) => Some(observation),
                RegionOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    /// `(region id, reason)` for every skipped region
    #[must_use]
    pub fn skipped(&self) -> Vec<(i64, &SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                RegionOutcome::Skipped { region, reason } => Some((region.id, reason)),
                RegionOutcome::Observed(_) => None,
            })
            .collect()
    }
}

/// Drives the forecast provider and reducer across a region set
#[derive(Clone)]
pub struct AggregationEngine {
    provider: Arc<dyn ForecastProvider>,
    max_concurrent_fetches: usize,
    deadline: Option<Duration>,
}

impl AggregationEngine {
    #[must_use]
    pub fn new(provider: Arc<dyn ForecastProvider>, max_concurrent_fetches: usize) -> Self {
        Self {
            provider,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
            deadline: None,
        }
    }

    /// Bound every fan-out by `deadline`
    ///
    /// Regions still pending when it passes are skipped with
    /// [`SkipReason::DeadlineExceeded`]; regions already observed are kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fetch and reduce every region; outcomes keep the order of `regions`
    #[instrument(skip(self, regions), fields(regions = regions.len()))]
    pub async fn fan_out(
        &self,
        regions: &[Region],
        strategy: ReductionStrategy,
    ) -> AggregationReport {
        let deadline = self.deadline.map(|limit| Instant::now() + limit);

        let outcomes: Vec<RegionOutcome> = stream::iter(regions.to_vec())
            .map(|region| self.observe_until(region, strategy, deadline))
            .boxed()
            .buffered(self.max_concurrent_fetches)
            .collect()
            .await;

        let report = AggregationReport { outcomes };
        info!(
            "Fan-out finished: {} observed, {} skipped",
            report.outcomes.len() - report.skipped().len(),
            report.skipped().len()
        );
        report
    }

    /// Horizon-mean observation for every region whose fetch succeeded, in catalog order
    pub async fn aggregate_all(&self, regions: &[Region]) -> Vec<RegionTemperatureObservation> {
        self.fan_out(regions, ReductionStrategy::HorizonMean)
            .await
            .into_observations()
    }

    /// Point observation for `region_id` on `date`
    ///
    /// The whole region set is fanned out and filtered afterwards, so the cost
    /// and provider traffic match [`Self::aggregate_all`]. Returns `None` if the
    /// id is unknown or its region produced no observation.
    pub async fn aggregate_one(
        &self,
        region_id: i64,
        date: NaiveDate,
        regions: &[Region],
    ) -> Option<RegionTemperatureObservation> {
        self.fan_out(regions, ReductionStrategy::OnDate(date))
            .await
            .into_observations()
            .into_iter()
            .find(|observation| observation.region.id == region_id)
    }

    async fn observe_until(
        &self,
        region: Region,
        strategy: ReductionStrategy,
        deadline: Option<Instant>,
    ) -> RegionOutcome {
        let Some(deadline) = deadline else {
            return self.observe(&region, strategy).await;
        };

        let observed = timeout_at(deadline, self.observe(&region, strategy)).await;
        match observed {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    region = %region.name,
                    id = region.id,
                    "Skipping district: fan-out deadline passed"
                );
                RegionOutcome::Skipped {
                    region,
                    reason: SkipReason::DeadlineExceeded,
                }
            }
        }
    }

    async fn observe(&self, region: &Region, strategy: ReductionStrategy) -> RegionOutcome {
        let skip = |reason: SkipReason| {
            warn!(
                region = %region.name,
                id = region.id,
                "Skipping district: {:?}",
                reason
            );
            RegionOutcome::Skipped {
                region: region.clone(),
                reason,
            }
        };

        let series = match self.provider.fetch(region.latitude, region.longitude).await {
            Ok(series) => series,
            Err(e) => return skip(SkipReason::FetchFailed(e.to_string())),
        };

        match strategy.reduce(&series) {
            Ok(temperature) => {
                debug!(
                    "{} ({}) -> {}",
                    region.name,
                    region.format_coordinates(),
                    temperature.format_temperature()
                );
                RegionOutcome::Observed(RegionTemperatureObservation::new(
                    region.clone(),
                    temperature,
                ))
            }
            Err(DistrictWeatherError::NoMatchingSample { .. }) => {
                skip(SkipReason::NoMatchingSample)
            }
            Err(e) => skip(SkipReason::FetchFailed(e.to_string())),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeProvider;
    use super::*;
    use rstest::rstest;

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    fn regions() -> Vec<Region> {
        vec![
            Region::new(1, "Dhaka", 23.7, 90.4),
            Region::new(2, "Chattogram", 22.3, 91.8),
            Region::new(3, "Sylhet", 24.9, 91.9),
        ]
    }

    fn engine(provider: FakeProvider) -> (AggregationEngine, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        (AggregationEngine::new(provider.clone(), 4), provider)
    }

    #[tokio::test]
    async fn test_aggregate_all_drops_failed_region_and_keeps_order() {
        let (engine, provider) = engine(
            FakeProvider::default()
                .with_daily(23.7, 90.4, &[(day("2024-03-01"), 18.0), (day("2024-03-02"), 20.0)])
                .with_daily(24.9, 91.9, &[(day("2024-03-01"), 16.0)]),
        );

        let observations = engine.aggregate_all(&regions()).await;

        assert_eq!(provider.calls(), 3);
        let ids: Vec<i64> = observations.iter().map(|o| o.region.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(observations[0].celsius(), 19.0);
        assert_eq!(observations[1].celsius(), 16.0);
    }

    #[tokio::test]
    async fn test_fan_out_reports_skip_reasons() {
        let (engine, _) = engine(
            FakeProvider::default()
                .with_daily(23.7, 90.4, &[(day("2024-03-01"), 18.0)])
                .with_daily(24.9, 91.9, &[(day("2024-03-02"), 16.0)]),
        );

        let report = engine
            .fan_out(&regions(), ReductionStrategy::OnDate(day("2024-03-01")))
            .await;

        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes[0].observation().is_some());
        assert_eq!(report.outcomes[1].region().id, 2);

        let skipped = report.skipped();
        assert_eq!(skipped.len(), 2);
        assert!(matches!(skipped[0], (2, SkipReason::FetchFailed(_))));
        assert_eq!(skipped[1], (3, &SkipReason::NoMatchingSample));
    }

    #[tokio::test]
    async fn test_aggregate_one_fans_out_over_whole_set() {
        let (engine, provider) = engine(
            FakeProvider::default()
                .with_daily(23.7, 90.4, &[(day("2024-03-01"), 18.0)])
                .with_daily(22.3, 91.8, &[(day("2024-03-01"), 25.0)])
                .with_daily(24.9, 91.9, &[(day("2024-03-01"), 16.0)]),
        );

        let observation = engine
            .aggregate_one(2, day("2024-03-01"), &regions())
            .await
            .unwrap();

        assert_eq!(provider.calls(), 3);
        assert_eq!(observation.region.name, "Chattogram");
        assert_eq!(observation.celsius(), 25.0);
    }

    #[rstest]
    #[case(99, "2024-03-01")]
    #[case(1, "2030-01-01")]
    #[tokio::test]
    async fn test_aggregate_one_not_found(#[case] region_id: i64, #[case] date: &str) {
        let (engine, _) =
            engine(FakeProvider::default().with_daily(23.7, 90.4, &[(day("2024-03-01"), 18.0)]));

        let result = engine.aggregate_one(region_id, day(date), &regions()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_aggregate_all_empty_catalog() {
        let (engine, provider) = engine(FakeProvider::default());
        assert!(engine.aggregate_all(&[]).await.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_fan_out_keeps_catalog_order_when_fetches_finish_out_of_order() {
        let provider = Arc::new(
            FakeProvider::default()
                .with_daily(23.7, 90.4, &[(day("2024-03-01"), 18.0)])
                .with_daily(22.3, 91.8, &[(day("2024-03-01"), 25.0)])
                .with_daily(24.9, 91.9, &[(day("2024-03-01"), 16.0)])
                .with_delay(23.7, 90.4, Duration::from_millis(150))
                .with_delay(22.3, 91.8, Duration::from_millis(10))
                .with_delay(24.9, 91.9, Duration::from_millis(40)),
        );
        let engine = AggregationEngine::new(provider.clone(), 2);

        let observations = engine.aggregate_all(&regions()).await;

        let ids: Vec<i64> = observations.iter().map(|o| o.region.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(provider.calls(), 3);
        assert_eq!(provider.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_deadline_keeps_regions_observed_in_time() {
        let provider = Arc::new(
            FakeProvider::default()
                .with_daily(23.7, 90.4, &[(day("2024-03-01"), 18.0)])
                .with_daily(22.3, 91.8, &[(day("2024-03-01"), 25.0)])
                .with_daily(24.9, 91.9, &[(day("2024-03-01"), 16.0)])
                .with_delay(22.3, 91.8, Duration::from_secs(10))
                .with_delay(24.9, 91.9, Duration::from_secs(10)),
        );
        let engine =
            AggregationEngine::new(provider, 1).with_deadline(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let report = engine.fan_out(&regions(), ReductionStrategy::HorizonMean).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.outcomes[0].observation().unwrap().celsius(), 18.0);
        assert_eq!(
            report.skipped(),
            vec![
                (2, &SkipReason::DeadlineExceeded),
                (3, &SkipReason::DeadlineExceeded)
            ]
        );
    }
}
