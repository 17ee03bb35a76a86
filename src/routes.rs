use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::dashboard::handlers as dashboard_handlers;
use crate::openapi::swagger_ui;
use crate::preferences::handlers as preferences_handlers;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the dashboard routes
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_handlers::get_dashboard))
        .route("/dashboard/search", post(dashboard_handlers::search))
        .route("/dashboard/retry", post(dashboard_handlers::retry))
}

/// Build the settings and favorites routes
fn preferences_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(preferences_handlers::get_settings).put(preferences_handlers::put_settings),
        )
        .route(
            "/settings/unit/toggle",
            post(dashboard_handlers::toggle_unit),
        )
        .route(
            "/settings/theme/toggle",
            post(dashboard_handlers::toggle_theme),
        )
        .route(
            "/favorites",
            get(preferences_handlers::list_favorites)
                .post(preferences_handlers::add_favorite)
                .put(preferences_handlers::put_favorites),
        )
        .route(
            "/favorites/toggle",
            post(dashboard_handlers::toggle_favorite),
        )
        .route(
            "/favorites/{name}",
            delete(preferences_handlers::remove_favorite),
        )
}

/// Build the raw weather routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather/{city}", get(weather_handlers::get_weather))
        .route("/forecast/{city}", get(weather_handlers::get_forecast))
}

/// Build all API v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(dashboard_routes())
        .merge(preferences_routes())
        .merge(weather_routes())
}

/// Build the complete application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check at root level
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
        // Swagger UI for API documentation
        .merge(swagger_ui())
}
