//! Hourly forecast series model

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Hourly temperature series in the region's local time
///
/// `timestamps` and `temperatures` are index-aligned and always have the same
/// length; the constructor refuses anything else.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlyForecastSeries {
    timestamps: Vec<NaiveDateTime>,
    temperatures: Vec<f64>,
}

impl HourlyForecastSeries {
    /// Create a series from aligned vectors, `None` if their lengths differ
    #[must_use]
    pub fn new(timestamps: Vec<NaiveDateTime>, temperatures: Vec<f64>) -> Option<Self> {
        (timestamps.len() == temperatures.len()).then_some(Self {
            timestamps,
            temperatures,
        })
    }

    /// Build a series from `(timestamp, temperature)` pairs
    pub fn from_samples(samples: impl IntoIterator<Item = (NaiveDateTime, f64)>) -> Self {
        let (timestamps, temperatures) = samples.into_iter().unzip();
        Self {
            timestamps,
            temperatures,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Iterate over `(timestamp, temperature)` pairs in provider order
    pub fn samples(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.temperatures.iter().copied())
    }

    /// Samples whose local hour equals `hour`, across every date
    pub fn at_hour(&self, hour: u32) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.samples().filter(move |(time, _)| time.hour() == hour)
    }

    /// First sample on `date` at local `hour`
    #[must_use]
    pub fn at_date_and_hour(&self, date: NaiveDate, hour: u32) -> Option<f64> {
        self.at_hour(hour)
            .find(|(time, _)| time.date() == date)
            .map(|(_, temperature)| temperature)
    }

    /// First and last local date covered by the series
    #[must_use]
    pub fn horizon(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((
            self.timestamps.first()?.date(),
            self.timestamps.last()?.date(),
        ))
    }
}
