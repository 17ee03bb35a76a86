mod config;
mod dashboard;
mod error;
mod openapi;
mod preferences;
mod routes;
mod weather;

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json, Router,
};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::error::ErrorResponse;
use crate::preferences::{FileStore, KeyValueStore, MemoryStore, PreferenceStore};
use crate::weather::WeatherService;

/// Shared HTTP client configuration
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Upper bound for a whole inbound request (a search makes two upstream calls)
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub preferences: Arc<PreferenceStore>,
    pub dashboard: Arc<Dashboard>,
    pub config: Arc<AppConfig>,
}

/// Create shared HTTP client with connection pooling
fn create_http_client(config: &AppConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .build()
}

/// Pick the preference backend: a JSON file, or memory when no path is configured
async fn create_preference_store(config: &AppConfig) -> PreferenceStore {
    let path = config.preferences_path.trim();
    let store: Arc<dyn KeyValueStore> = if path.is_empty() {
        tracing::warn!("No preferences_path configured, preferences will not survive restarts");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!(path = %path, "Using file-backed preferences");
        Arc::new(FileStore::open(path).await)
    };
    PreferenceStore::new(store)
}

/// Middleware failures get the same JSON body as handler errors
async fn handle_middleware_error(err: BoxError) -> Response {
    let (status, body) = if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            ErrorResponse::with_code("Request timed out", "REQUEST_TIMEOUT"),
        )
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::with_code(format!("Internal error: {}", err), "INTERNAL_ERROR"),
        )
    };
    (status, Json(body)).into_response()
}

/// Router plus the middleware stack: request timeout, gzip, CORS, access logs
fn build_app(state: AppState, request_timeout: Duration) -> Router {
    routes::build_router(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weatherdash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded successfully");

    let http_client = create_http_client(&config)?;
    tracing::debug!("Shared HTTP client created");

    let weather_service = Arc::new(WeatherService::new(
        http_client,
        &config.weatherapi_key,
        &config.weatherapi_base_url,
    ));
    let preferences = Arc::new(create_preference_store(&config).await);
    let dashboard = Arc::new(Dashboard::new(
        Arc::clone(&weather_service),
        Arc::clone(&preferences),
        config.forecast_days,
    ));

    let state = AppState {
        weather_service,
        preferences,
        dashboard,
        config: Arc::new(config.clone()),
    };

    let app = build_app(state, Duration::from_secs(REQUEST_TIMEOUT_SECS));

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Weatherdash listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn offline_state() -> AppState {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            weatherapi_key: "test_api_key".to_string(),
            // Nothing listens on the discard port
            weatherapi_base_url: "http://127.0.0.1:9".to_string(),
            forecast_days: 7,
            preferences_path: String::new(),
            request_timeout_secs: 5,
        };
        let weather_service = Arc::new(WeatherService::new(
            Client::new(),
            &config.weatherapi_key,
            &config.weatherapi_base_url,
        ));
        let preferences = Arc::new(PreferenceStore::new(Arc::new(MemoryStore::new())));
        let dashboard = Arc::new(Dashboard::new(
            Arc::clone(&weather_service),
            Arc::clone(&preferences),
            config.forecast_days,
        ));
        AppState {
            weather_service,
            preferences,
            dashboard,
            config: Arc::new(config),
        }
    }

    #[tokio::test]
    async fn test_timeout_returns_json_error() {
        let elapsed = Box::new(tower::timeout::error::Elapsed::new());
        let response = handle_middleware_error(elapsed).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["code"], "REQUEST_TIMEOUT");
    }

    #[tokio::test]
    async fn test_app_serves_health_through_middleware() {
        let app = build_app(offline_state(), Duration::from_secs(5));
        let request = Request::builder()
            .uri("/health")
            .header("accept-encoding", "identity")
            .body(Body::empty())
            .expect("valid request");

        let response = app.oneshot(request).await.expect("request should complete");
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["status"], "ok");
    }
}
