//! Per-region temperature observations and travel verdicts

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Region;

/// A region's reduced temperature at the reference hour
///
/// The two variants are never interchangeable: a horizon mean summarises the
/// whole forecast, an on-date value is one sample.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepresentativeTemperature {
    /// Mean of every reference-hour sample in the forecast horizon
    HorizonMean { celsius: f64, samples: usize },
    /// The single reference-hour sample on `date`
    OnDate { celsius: f64, date: NaiveDate },
}

impl RepresentativeTemperature {
    /// Temperature in Celsius regardless of how it was reduced
    #[must_use]
    pub fn celsius(&self) -> f64 {
        match *self {
            Self::HorizonMean { celsius, .. } | Self::OnDate { celsius, .. } => celsius,
        }
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.celsius())
    }
}

/// Representative temperature for one region, built per request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RegionTemperatureObservation {
    pub region: Region,
    pub temperature: RepresentativeTemperature,
    /// When the observation was computed, not when the weather occurs
    pub observed_at: DateTime<Utc>,
}

impl RegionTemperatureObservation {
    #[must_use]
    pub fn new(region: Region, temperature: RepresentativeTemperature) -> Self {
        Self {
            region,
            temperature,
            observed_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn celsius(&self) -> f64 {
        self.temperature.celsius()
    }
}

/// Binary outcome of a travel comparison
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Recommended,
    NotRecommended,
}

impl Verdict {
    /// Recommended only when the origin is strictly warmer than the destination
    #[must_use]
    pub fn compare(origin_celsius: f64, destination_celsius: f64) -> Self {
        if origin_celsius > destination_celsius {
            Self::Recommended
        } else {
            Self::NotRecommended
        }
    }

    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Recommended => "Travel is recommended",
            Self::NotRecommended => "Travel is not recommended",
        }
    }
}

/// Result of comparing origin and destination temperatures on a travel date
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TravelRecommendation {
    pub origin_temperature: f64,
    pub destination_temperature: f64,
    pub verdict: Verdict,
}

impl TravelRecommendation {
    #[must_use]
    pub fn new(origin_temperature: f64, destination_temperature: f64) -> Self {
        Self {
            origin_temperature,
            destination_temperature,
            verdict: Verdict::compare(origin_temperature, destination_temperature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(25.0, 18.0, Verdict::Recommended)]
    #[case(18.0, 25.0, Verdict::NotRecommended)]
    #[case(21.5, 21.5, Verdict::NotRecommended)]
    #[case(-3.0, -7.5, Verdict::Recommended)]
    fn test_verdict_compare(#[case] origin: f64, #[case] destination: f64, #[case] expected: Verdict) {
        assert_eq!(Verdict::compare(origin, destination), expected);
    }

    #[rstest]
    #[case(25.0, 18.0)]
    #[case(0.1, 0.0)]
    #[case(12.0, 12.0)]
    fn test_verdict_antisymmetric_except_at_equality(#[case] a: f64, #[case] b: f64) {
        let forward = Verdict::compare(a, b);
        let backward = Verdict::compare(b, a);
        if a == b {
            assert_eq!(forward, Verdict::NotRecommended);
            assert_eq!(backward, Verdict::NotRecommended);
        } else {
            assert_ne!(forward, backward);
        }
    }

    #[test]
    fn test_representative_temperature_celsius() {
        let mean = RepresentativeTemperature::HorizonMean {
            celsius: 19.25,
            samples: 7,
        };
        let point = RepresentativeTemperature::OnDate {
            celsius: 18.0,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(mean.celsius(), 19.25);
        assert_eq!(point.celsius(), 18.0);
        assert_eq!(point.format_temperature(), "18.0°C");
    }

    #[test]
    fn test_recommendation_describe() {
        let recommendation = TravelRecommendation::new(30.0, 20.0);
        assert_eq!(recommendation.verdict, Verdict::Recommended);
        assert_eq!(recommendation.verdict.describe(), "Travel is recommended");
    }
}
