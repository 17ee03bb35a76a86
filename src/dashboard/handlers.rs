use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use super::view::DashboardView;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// City name as typed in the search box
    pub city: String,
}

/// GET /dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.view().await)
}

/// Run a search and return the resulting view
///
/// Lookup failures are part of the view (error panel), not an HTTP error.
///
/// POST /dashboard/search
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<DashboardView> {
    Json(state.dashboard.search(&request.city).await)
}

/// POST /dashboard/retry
pub async fn retry(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.retry().await)
}

/// POST /settings/unit/toggle
pub async fn toggle_unit(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.toggle_unit().await)
}

/// POST /settings/theme/toggle
pub async fn toggle_theme(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.toggle_theme().await)
}

/// POST /favorites/toggle
pub async fn toggle_favorite(State(state): State<AppState>) -> Json<DashboardView> {
    Json(state.dashboard.toggle_favorite().await)
}
