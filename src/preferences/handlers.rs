use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use thiserror::Error;

use super::models::{FavoriteCity, Settings};
use crate::error::HttpError;
use crate::impl_into_response;
use crate::AppState;

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl HttpError for PreferencesError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInput(_) => Some("INVALID_INPUT"),
        }
    }
}

impl_into_response!(PreferencesError);

/// GET /settings
pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.preferences.get_settings().await)
}

/// Replace both settings at once
///
/// PUT /settings
pub async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Json<Settings> {
    state.preferences.save_settings(&settings).await;
    Json(state.preferences.get_settings().await)
}

/// GET /favorites
pub async fn list_favorites(State(state): State<AppState>) -> Json<Vec<FavoriteCity>> {
    Json(state.preferences.get_favorites().await)
}

/// Add a favorite city; adding a name that is already saved is a no-op
///
/// POST /favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(city): Json<FavoriteCity>,
) -> Result<(StatusCode, Json<Vec<FavoriteCity>>), PreferencesError> {
    let added = state.preferences.add_favorite(normalize(city)?).await;

    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(state.preferences.get_favorites().await)))
}

/// Replace the whole favorites list, dropping case-insensitive duplicates
///
/// PUT /favorites
pub async fn put_favorites(
    State(state): State<AppState>,
    Json(cities): Json<Vec<FavoriteCity>>,
) -> Result<Json<Vec<FavoriteCity>>, PreferencesError> {
    let mut favorites: Vec<FavoriteCity> = Vec::with_capacity(cities.len());
    for city in cities {
        let city = normalize(city)?;
        if !favorites.iter().any(|f| f.matches(&city.name)) {
            favorites.push(city);
        }
    }

    state.preferences.save_favorites(&favorites).await;
    Ok(Json(state.preferences.get_favorites().await))
}

/// DELETE /favorites/{name}
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<Vec<FavoriteCity>> {
    state.preferences.remove_favorite(&name).await;
    Json(state.preferences.get_favorites().await)
}

/// Trim the name and country; a blank name is rejected, a blank country dropped
fn normalize(city: FavoriteCity) -> Result<FavoriteCity, PreferencesError> {
    let name = city.name.trim();
    if name.is_empty() {
        return Err(PreferencesError::InvalidInput(
            "City name cannot be empty".to_string(),
        ));
    }

    let country = city
        .country
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    Ok(FavoriteCity::new(name, country))
}
