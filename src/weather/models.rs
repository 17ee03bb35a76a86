use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Format of `location.localtime` and `hour[].time` in WeatherAPI responses
const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// ============================================================================
// Domain Models (what the dashboard renders)
// ============================================================================

/// Broad weather category used for background styling
///
/// Decided once when a provider record is ingested, so rendering never
/// has to inspect condition text again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
    #[default]
    Clear,
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

impl ConditionCategory {
    /// Classify free-form condition text ("Patchy light drizzle", "Overcast", ...)
    pub fn from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

        if has(&["rain", "drizzle", "shower", "thunder"]) {
            Self::Rainy
        } else if has(&["snow", "sleet", "blizzard", "ice"]) {
            Self::Snowy
        } else if has(&["cloud", "overcast", "mist", "fog"]) {
            Self::Cloudy
        } else if has(&["sun"]) {
            Self::Sunny
        } else {
            Self::Clear
        }
    }

    /// CSS class for the page background
    pub fn background_class(&self) -> &'static str {
        match self {
            Self::Clear => "bg-clear",
            Self::Sunny => "bg-sunny",
            Self::Cloudy => "bg-cloudy",
            Self::Rainy => "bg-rainy",
            Self::Snowy => "bg-snowy",
        }
    }
}

/// Condition text, icon and category of a reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    pub category: ConditionCategory,
}

impl Condition {
    pub fn new(text: impl Into<String>, icon: impl Into<String>) -> Self {
        let text = text.into();
        let category = ConditionCategory::from_text(&text);
        Self {
            text,
            icon: normalize_icon_url(&icon.into()),
            category,
        }
    }
}

/// One point-in-time reading for a city. Temperatures are Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub condition: Condition,
    pub humidity: f64,
    pub wind_kph: f64,
    pub pressure_mb: f64,
    pub visibility_km: f64,
    pub uv_index: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub condition: Condition,
    pub max_c: f64,
    pub min_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastHour {
    pub time: NaiveDateTime,
    pub condition: Condition,
    pub temp_c: f64,
}

/// Multi-day forecast with the hours of every day flattened in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    /// Local time at the location when the forecast was issued
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_time: Option<NaiveDateTime>,
    pub days: Vec<ForecastDay>,
    pub hours: Vec<ForecastHour>,
}

// ============================================================================
// WeatherAPI Responses (Internal)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiLocation {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub localtime: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCondition {
    pub text: String,
    #[serde(default)]
    pub icon: String,
}

impl From<ApiCondition> for Condition {
    fn from(c: ApiCondition) -> Self {
        Condition::new(c.text, c.icon)
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiCurrent {
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub condition: ApiCondition,
    pub humidity: f64,
    pub wind_kph: f64,
    pub pressure_mb: f64,
    pub vis_km: f64,
    pub uv: f64,
}

/// Response of `current.json`
#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub location: ApiLocation,
    pub current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
pub struct ApiDay {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
pub struct ApiHour {
    pub time: String,
    pub temp_c: f64,
    pub condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
pub struct ApiForecastDay {
    pub date: NaiveDate,
    pub day: ApiDay,
    #[serde(default)]
    pub hour: Vec<ApiHour>,
}

#[derive(Debug, Deserialize)]
pub struct ApiForecast {
    #[serde(default)]
    pub forecastday: Vec<ApiForecastDay>,
}

/// Response of `forecast.json`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub location: ApiLocation,
    pub forecast: ApiForecast,
}

/// Error envelope: `{"error": {"code": 1006, "message": "No matching location found."}}`
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i32>,
    pub message: String,
}

impl From<CurrentResponse> for WeatherSnapshot {
    fn from(r: CurrentResponse) -> Self {
        WeatherSnapshot {
            city: r.location.name,
            country: r.location.country,
            temperature_c: r.current.temp_c,
            feels_like_c: r.current.feelslike_c,
            condition: r.current.condition.into(),
            humidity: r.current.humidity,
            wind_kph: r.current.wind_kph,
            pressure_mb: r.current.pressure_mb,
            visibility_km: r.current.vis_km,
            uv_index: r.current.uv,
            local_time: r.location.localtime.as_deref().and_then(parse_provider_time),
        }
    }
}

impl From<ForecastResponse> for Forecast {
    fn from(r: ForecastResponse) -> Self {
        let mut days = Vec::with_capacity(r.forecast.forecastday.len());
        let mut hours = Vec::new();

        for fd in r.forecast.forecastday {
            hours.extend(fd.hour.into_iter().filter_map(|h| {
                let Some(time) = parse_provider_time(&h.time) else {
                    tracing::debug!(time = %h.time, "Skipping forecast hour with unparseable time");
                    return None;
                };
                Some(ForecastHour {
                    time,
                    condition: h.condition.into(),
                    temp_c: h.temp_c,
                })
            }));
            days.push(ForecastDay {
                date: fd.date,
                condition: fd.day.condition.into(),
                max_c: fd.day.maxtemp_c,
                min_c: fd.day.mintemp_c,
            });
        }

        Forecast {
            city: r.location.name,
            country: r.location.country,
            local_time: r.location.localtime.as_deref().and_then(parse_provider_time),
            days,
            hours,
        }
    }
}

/// Parse "2026-10-18 9:05" style timestamps
pub fn parse_provider_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), PROVIDER_TIME_FORMAT).ok()
}

/// WeatherAPI returns protocol-relative icon URLs ("//cdn.weatherapi.com/...")
fn normalize_icon_url(icon: &str) -> String {
    match icon.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => icon.to_string(),
    }
}
