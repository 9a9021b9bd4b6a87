use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::DistrictWeatherError;
use crate::models::{
    RegionTemperatureObservation, RepresentativeTemperature, TravelRecommendation, Verdict,
};
use crate::ranking::RankingService;
use crate::travel::{TravelRecommendationService, TravelRequest};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub ranking: RankingService,
    pub travel: TravelRecommendationService,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDistrict {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub long: f64,
    pub temperature: f64,
    pub samples: Option<usize>,
    pub observed_at: DateTime<Utc>,
}

impl From<&RegionTemperatureObservation> for ApiDistrict {
    fn from(observation: &RegionTemperatureObservation) -> Self {
        Self {
            id: observation.region.id,
            name: observation.region.name.clone(),
            lat: observation.region.latitude,
            long: observation.region.longitude,
            temperature: observation.celsius(),
            samples: match observation.temperature {
                RepresentativeTemperature::HorizonMean { samples, .. } => Some(samples),
                RepresentativeTemperature::OnDate { .. } => None,
            },
            observed_at: observation.observed_at,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTravelRequest {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(deserialize_with = "date_or_datetime")]
    pub travel_date: NaiveDate,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTravelRecommendation {
    pub origin_temperature: f64,
    pub destination_temperature: f64,
    pub verdict: Verdict,
    pub recommendation: String,
}

impl From<TravelRecommendation> for ApiTravelRecommendation {
    fn from(recommendation: TravelRecommendation) -> Self {
        Self {
            origin_temperature: recommendation.origin_temperature,
            destination_temperature: recommendation.destination_temperature,
            verdict: recommendation.verdict,
            recommendation: recommendation.verdict.describe().to_string(),
        }
    }
}

/// Accepts `2024-03-01` as well as `2024-03-01T09:30:00`
fn date_or_datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let value = String::deserialize(deserializer)?;
    value
        .parse::<NaiveDate>()
        .or_else(|_| value.parse::<NaiveDateTime>().map(|dt| dt.date()))
        .map_err(|_| serde::de::Error::custom(format!("invalid travel date: {value}")))
}

/// Error body returned by every route
pub struct ApiError(DistrictWeatherError);

impl From<DistrictWeatherError> for ApiError {
    fn from(err: DistrictWeatherError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DistrictWeatherError::Validation { .. } => StatusCode::BAD_REQUEST,
            DistrictWeatherError::CatalogFetch { .. } | DistrictWeatherError::CatalogParse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::debug!("Request rejected: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/districts/coolest", get(get_coolest_districts))
        .route(
            "/districts/travel-recommendation",
            post(post_travel_recommendation),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn get_coolest_districts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApiDistrict>>, ApiError> {
    let coolest = state.ranking.coolest_districts().await?;
    Ok(Json(coolest.iter().map(ApiDistrict::from).collect()))
}

async fn post_travel_recommendation(
    State(state): State<AppState>,
    payload: Result<Json<ApiTravelRequest>, JsonRejection>,
) -> Result<Json<ApiTravelRecommendation>, ApiError> {
    let Json(payload) =
        payload.map_err(|rejection| DistrictWeatherError::validation(rejection.body_text()))?;
    let request = TravelRequest::new(payload.origin, payload.destination, payload.travel_date);
    let today = Local::now().date_naive();
    let recommendation = state.travel.recommend(&request, today).await?;
    Ok(Json(recommendation.into()))
}
