use axum::http::StatusCode;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::models::{
    ApiErrorEnvelope, CurrentResponse, Forecast, ForecastResponse, WeatherSnapshot,
};
use crate::error::HttpError;
use crate::impl_into_response;

/// WeatherAPI error code for "No matching location found."
const LOCATION_NOT_FOUND_CODE: i32 = 1006;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Failed to fetch weather data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather API rejected the request: {0}")]
    Unauthorized(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Weather service unavailable: {0}")]
    UpstreamError(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::RequestError(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized(_) => StatusCode::BAD_GATEWAY,
            Self::ApiError(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::CityNotFound(_) => Some("CITY_NOT_FOUND"),
            Self::RequestError(_) => Some("REQUEST_ERROR"),
            Self::Unauthorized(_) => Some("UPSTREAM_UNAUTHORIZED"),
            Self::ApiError(_) => Some("API_ERROR"),
            Self::UpstreamError(_) => Some("UPSTREAM_ERROR"),
            Self::InvalidResponse(_) => Some("INVALID_RESPONSE"),
        }
    }
}

impl_into_response!(WeatherError);

/// Client for the WeatherAPI `current.json` and `forecast.json` endpoints
pub struct WeatherService {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherService {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Current conditions for a city
    pub async fn get_current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        tracing::debug!(city = %city, "Fetching current conditions");

        let data: CurrentResponse = self
            .fetch("current.json", city, &[("q", city), ("aqi", "no")])
            .await?;
        let snapshot = WeatherSnapshot::from(data);

        tracing::info!(
            city = %snapshot.city,
            temp = %snapshot.temperature_c,
            "Current conditions fetched successfully"
        );

        Ok(snapshot)
    }

    /// Daily and hourly forecast for the next `days` days
    pub async fn get_forecast(&self, city: &str, days: u8) -> Result<Forecast, WeatherError> {
        tracing::debug!(city = %city, days = days, "Fetching forecast");

        let days = days.to_string();
        let data: ForecastResponse = self
            .fetch(
                "forecast.json",
                city,
                &[("q", city), ("days", days.as_str()), ("aqi", "no"), ("alerts", "no")],
            )
            .await?;
        let forecast = Forecast::from(data);

        tracing::debug!(
            city = %forecast.city,
            days = forecast.days.len(),
            hours = forecast.hours.len(),
            "Forecast fetched successfully"
        );

        Ok(forecast)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        params: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        // Use query builder for proper URL encoding - handles spaces and special chars
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, endpoint = %endpoint, "Received API response");

        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::map_error(status, city, &body));
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::InvalidResponse(e.to_string()))
    }

    fn map_error(status: reqwest::StatusCode, city: &str, body: &str) -> WeatherError {
        let envelope = serde_json::from_str::<ApiErrorEnvelope>(body).ok();

        if let Some(err) = &envelope {
            if err.error.code == Some(LOCATION_NOT_FOUND_CODE) {
                return WeatherError::CityNotFound(city.to_string());
            }
        }

        let message = envelope
            .map(|e| e.error.message)
            .unwrap_or_else(|| format!("HTTP {}", status));

        match status {
            reqwest::StatusCode::NOT_FOUND => WeatherError::CityNotFound(city.to_string()),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                WeatherError::Unauthorized(message)
            }
            s if s.is_client_error() => WeatherError::ApiError(message),
            _ => WeatherError::UpstreamError(message),
        }
    }
}
