use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::models::{DailyForecast, WeatherReading};
use super::service::{WeatherError, MAX_FORECAST_DAYS};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Number of days, 1 to 5
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Current weather for a city
///
/// GET /weather/{city}/{country}
pub async fn get_weather(
    State(state): State<AppState>,
    Path((city, country)): Path<(String, String)>,
) -> Result<Json<WeatherReading>, WeatherError> {
    let reading = state
        .weather_service
        .get_current_weather(&city, &country)
        .await?;
    Ok(Json(reading))
}

/// Daily forecast with a caller-chosen number of days
///
/// GET /weather/forecast/{city}/{country}?days=5
pub async fn get_forecast(
    State(state): State<AppState>,
    Path((city, country)): Path<(String, String)>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<Vec<DailyForecast>>, WeatherError> {
    let days = query.days.unwrap_or(MAX_FORECAST_DAYS);
    fetch_forecast(&state, &city, &country, days).await
}

/// GET /weather/forecast/3days/{city}/{country}
pub async fn get_three_day_forecast(
    State(state): State<AppState>,
    Path((city, country)): Path<(String, String)>,
) -> Result<Json<Vec<DailyForecast>>, WeatherError> {
    fetch_forecast(&state, &city, &country, 3).await
}

/// GET /weather/forecast/5days/{city}/{country}
pub async fn get_five_day_forecast(
    State(state): State<AppState>,
    Path((city, country)): Path<(String, String)>,
) -> Result<Json<Vec<DailyForecast>>, WeatherError> {
    fetch_forecast(&state, &city, &country, 5).await
}

async fn fetch_forecast(
    state: &AppState,
    city: &str,
    country: &str,
    days: u32,
) -> Result<Json<Vec<DailyForecast>>, WeatherError> {
    let daily = state
        .weather_service
        .get_forecast(city, country, days)
        .await?;
    Ok(Json(daily))
}
