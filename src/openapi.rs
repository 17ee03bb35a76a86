use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dashboard::handlers::SearchRequest;
use crate::dashboard::view::{CurrentView, DailyView, DashboardView, HourlyView, UvLevel};
use crate::dashboard::PanelState;
use crate::error::ErrorResponse;
use crate::preferences::{FavoriteCity, Settings, TemperatureUnit, Theme};
use crate::weather::models::{
    Condition, ConditionCategory, Forecast, ForecastDay, ForecastHour, WeatherSnapshot,
};

/// OpenAPI documentation for the dashboard API
///
/// Schema-only: routes are listed in `routes.rs`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weatherdash API",
        version = "1.0.0",
        description = "Weather dashboard backed by WeatherAPI. Serves a ready-to-render view \
            of current conditions and forecasts, plus persisted favorites and display settings.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "dashboard", description = "Dashboard view, search and retry"),
        (name = "preferences", description = "Favorite cities and display settings"),
        (name = "weather", description = "Raw current conditions and forecasts")
    ),
    components(
        schemas(
            ErrorResponse,
            DashboardView,
            CurrentView,
            HourlyView,
            DailyView,
            UvLevel,
            PanelState,
            SearchRequest,
            Settings,
            TemperatureUnit,
            Theme,
            FavoriteCity,
            WeatherSnapshot,
            Forecast,
            ForecastDay,
            ForecastHour,
            Condition,
            ConditionCategory,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
