//! Region model for catalog districts

use serde::{Deserialize, Deserializer, Serialize};

/// An administrative district from the region catalog
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Region {
    /// Catalog-assigned identifier
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    /// District name, unique within the catalog
    pub name: String,
    /// Latitude in decimal degrees
    #[serde(rename = "lat", deserialize_with = "lenient::coordinate")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(rename = "long", deserialize_with = "lenient::coordinate")]
    pub longitude: f64,
}

impl Region {
    /// Create a new region
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Case-insensitive exact name comparison
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Format region coordinates for logging
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// First region whose name matches `name` case-insensitively
#[must_use]
pub fn find_by_name<'a>(regions: &'a [Region], name: &str) -> Option<&'a Region> {
    regions.iter().find(|region| region.matches_name(name))
}

/// Published district lists encode numbers either as JSON numbers or as strings.
mod lenient {
    use super::{Deserialize, Deserializer};
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Int(i64),
        Float(f64),
        Text(String),
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Int(value) => Ok(value),
            NumberOrString::Float(value) => Err(D::Error::custom(format!(
                "district id must be an integer, got {value}"
            ))),
            NumberOrString::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid district id: {text}"))),
        }
    }

    pub fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match NumberOrString::deserialize(deserializer)? {
            #[allow(clippy::cast_precision_loss)]
            NumberOrString::Int(value) => Ok(value as f64),
            NumberOrString::Float(value) => Ok(value),
            NumberOrString::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid coordinate: {text}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_deserialize_numeric() {
        let region: Region =
            serde_json::from_str(r#"{"id": 1, "name": "Dhaka", "lat": 23.7, "long": 90.4}"#)
                .unwrap();
        assert_eq!(region, Region::new(1, "Dhaka", 23.7, 90.4));
    }

    #[test]
    fn test_region_deserialize_string_encoded() {
        let region: Region = serde_json::from_str(
            r#"{"id": "47", "division_id": "3", "name": "Dhaka", "bn_name": "ঢাকা", "lat": "23.7115253", "long": "90.4111451"}"#,
        )
        .unwrap();
        assert_eq!(region.id, 47);
        assert_eq!(region.latitude, 23.711_525_3);
        assert_eq!(region.longitude, 90.411_145_1);
    }

    #[test]
    fn test_region_deserialize_rejects_bad_coordinate() {
        let result: Result<Region, _> =
            serde_json::from_str(r#"{"id": 1, "name": "Dhaka", "lat": "north", "long": 90.4}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_by_name_is_case_insensitive_first_match() {
        let regions = vec![
            Region::new(1, "Dhaka", 23.7, 90.4),
            Region::new(2, "Chattogram", 22.3, 91.8),
            Region::new(3, "dhaka", 0.0, 0.0),
        ];

        assert_eq!(find_by_name(&regions, "DHAKA").map(|r| r.id), Some(1));
        assert_eq!(find_by_name(&regions, "chattogram").map(|r| r.id), Some(2));
        assert!(find_by_name(&regions, "Chatto").is_none());
    }
}
