use anyhow::{Context, Result};
use district_weather::{AppConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging)?;

    tracing::info!(
        "district-weather {} (catalog: {}, forecast: {})",
        district_weather::VERSION,
        config
            .catalog
            .path
            .as_ref()
            .map_or_else(|| config.catalog.url.clone(), |p| p.display().to_string()),
        config.weather.base_url
    );

    web::run(config).await
}
