//! Region catalog loading
//!
//! The catalog is a JSON document of the form `{ "districts": [ ... ] }`. It is
//! loaded fresh for every request through a [`CatalogSource`].

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::models::Region;
use crate::{DistrictWeatherError, Result};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    districts: Vec<Region>,
}

/// Parse a district list. Duplicates and out-of-range coordinates pass through.
pub fn parse_catalog(json: &str) -> Result<Vec<Region>> {
    let document: CatalogDocument = serde_json::from_str(json)
        .map_err(|e| DistrictWeatherError::catalog_parse(e.to_string()))?;
    Ok(document.districts)
}

/// Somewhere a district list can be loaded from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Vec<Region>>;
}

/// Catalog served over HTTP
pub struct HttpCatalogSource {
    client: Client,
    url: String,
}

impl HttpCatalogSource {
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> Result<Vec<Region>> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            warn!("Catalog request failed: {}", e);
            DistrictWeatherError::catalog_fetch(format!("Failed to fetch the JSON file: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Catalog request returned HTTP {}", status);
            return Err(DistrictWeatherError::catalog_fetch(format!(
                "Failed to fetch the JSON file: HTTP {status}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            DistrictWeatherError::catalog_fetch(format!("Failed to read the JSON file: {e}"))
        })?;

        let regions = parse_catalog(&body)?;
        info!("Loaded {} districts from catalog", regions.len());
        Ok(regions)
    }
}

/// Catalog read from a local JSON file
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Vec<Region>> {
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DistrictWeatherError::catalog_fetch(format!(
                "Failed to read {}: {e}",
                self.path.display()
            ))
        })?;

        let regions = parse_catalog(&body)?;
        debug!("Loaded {} districts from file", regions.len());
        Ok(regions)
    }
}
