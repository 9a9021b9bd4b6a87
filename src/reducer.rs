//! Daily-representative temperature reduction
//!
//! Every strategy samples the hourly series at [`REFERENCE_HOUR`] local time.
//! Values from different hours are never mixed.

use chrono::NaiveDate;

use crate::models::{HourlyForecastSeries, RepresentativeTemperature};
use crate::{DistrictWeatherError, Result};

/// Local hour (2 PM) used as the daily proxy
pub const REFERENCE_HOUR: u32 = 14;

/// How an hourly series becomes one representative temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionStrategy {
    /// Mean of every reference-hour sample across the returned horizon
    HorizonMean,
    /// The reference-hour sample on one specific local date
    OnDate(NaiveDate),
}

impl ReductionStrategy {
    /// Reduce `series`, failing with `NoMatchingSample` when nothing is at the reference hour
    pub fn reduce(&self, series: &HourlyForecastSeries) -> Result<RepresentativeTemperature> {
        match *self {
            Self::HorizonMean => {
                let (sum, samples) = series
                    .at_hour(REFERENCE_HOUR)
                    .fold((0.0, 0usize), |(sum, count), (_, t)| (sum + t, count + 1));

                if samples == 0 {
                    return Err(DistrictWeatherError::NoMatchingSample { date: None });
                }

                #[allow(clippy::cast_precision_loss)]
                let celsius = sum / samples as f64;
                Ok(RepresentativeTemperature::HorizonMean { celsius, samples })
            }
            Self::OnDate(date) => series
                .at_date_and_hour(date, REFERENCE_HOUR)
                .map(|celsius| RepresentativeTemperature::OnDate { celsius, date })
                .ok_or(DistrictWeatherError::NoMatchingSample { date: Some(date) }),
        }
    }
}
