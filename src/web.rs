use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::StatusCode;
use reqwest::Client;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::aggregation::AggregationEngine;
use crate::api::{self, AppState};
use crate::catalog::{CatalogSource, FileCatalogSource, HttpCatalogSource};
use crate::config::AppConfig;
use crate::ranking::RankingService;
use crate::travel::TravelRecommendationService;
use crate::weather::OpenMeteoClient;

impl AppState {
    /// Wire catalog source, forecast client and services from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let catalog: Arc<dyn CatalogSource> = match &config.catalog.path {
            Some(path) => Arc::new(FileCatalogSource::new(path.clone())),
            None => {
                let client = Client::builder()
                    .timeout(config.catalog.timeout())
                    .user_agent(config.weather.user_agent.as_str())
                    .build()
                    .context("Failed to build catalog HTTP client")?;
                Arc::new(HttpCatalogSource::new(client, config.catalog.url.as_str()))
            }
        };

        let provider = OpenMeteoClient::from_config(&config.weather)?;
        let engine =
            AggregationEngine::new(Arc::new(provider), config.weather.max_concurrent_fetches)
                .with_deadline(config.weather.fan_out_timeout());

        Ok(Self {
            ranking: RankingService::new(catalog.clone(), engine.clone(), config.ranking.top_n),
            travel: TravelRecommendationService::new(catalog, engine),
        })
    }
}

/// Full application router with middleware
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.server.request_timeout(),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: AppConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = app(state, &config);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
