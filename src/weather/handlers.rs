use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::models::{Forecast, WeatherSnapshot};
use super::service::WeatherError;
use crate::AppState;

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

/// Current conditions for a city, bypassing the dashboard state
///
/// GET /weather/{city}
pub async fn get_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherSnapshot>, WeatherError> {
    let snapshot = state.weather_service.get_current(city.trim()).await?;
    Ok(Json(snapshot))
}

/// Daily and hourly forecast for a city
///
/// GET /forecast/{city}
pub async fn get_forecast(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<Forecast>, WeatherError> {
    let forecast = state
        .weather_service
        .get_forecast(city.trim(), state.config.forecast_days)
        .await?;
    Ok(Json(forecast))
}
