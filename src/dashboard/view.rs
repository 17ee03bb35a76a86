use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use utoipa::ToSchema;

use super::state::{DashboardState, PanelState};
use crate::preferences::{FavoriteCity, Settings, TemperatureUnit, Theme};
use crate::weather::models::{ConditionCategory, Forecast, WeatherSnapshot};

pub const NO_FORECAST_MESSAGE: &str = "No forecast data available";
pub const NO_FAVORITES_MESSAGE: &str =
    "No favorite cities yet. Search for a city and add it to favorites!";

/// Number of entries in the hourly strip
const HOURLY_STRIP_LEN: usize = 24;

// ============================================================================
// View Models (what clients render)
// ============================================================================

/// UV index severity band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl UvLevel {
    pub fn from_index(uv: f64) -> Self {
        if uv <= 2.0 {
            Self::Low
        } else if uv <= 5.0 {
            Self::Moderate
        } else if uv <= 7.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Low => "uv-low",
            Self::Moderate => "uv-moderate",
            Self::High => "uv-high",
            Self::VeryHigh => "uv-very-high",
        }
    }
}

/// Current conditions panel. Keys match the page's element ids.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentView {
    pub city_name: String,
    pub date_time: String,
    pub current_temp: String,
    pub weather_condition: String,
    pub weather_icon: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub visibility: String,
    pub uv_index: String,
    pub uv_level: UvLevel,
    pub uv_class: String,
    pub background: ConditionCategory,
    pub background_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HourlyView {
    pub time: String,
    pub icon: String,
    pub condition: String,
    pub temp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyView {
    pub day: String,
    pub icon: String,
    pub condition: String,
    pub high: String,
    pub low: String,
}

/// Everything a client needs to draw the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub panel: PanelState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub theme: Theme,
    pub theme_class: String,
    pub theme_icon: String,
    pub unit: TemperatureUnit,
    pub unit_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentView>,
    pub hourly: Vec<HourlyView>,
    pub weekly: Vec<DailyView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_message: Option<String>,
    pub favorites: Vec<FavoriteCity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites_message: Option<String>,
    pub is_favorite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_search: Option<String>,
}

// ============================================================================
// Rendering
// ============================================================================

/// Build the view for the given state as of `now`. Pure: no I/O and no
/// clock reads; demo data and snapshots without a local time use `now`.
pub fn render(
    state: &DashboardState,
    settings: &Settings,
    favorites: &[FavoriteCity],
    now: NaiveDateTime,
) -> DashboardView {
    let state = state.at(now);
    let state: &DashboardState = &state;
    let today = now.date();
    let unit = settings.unit;
    let snapshot = state.visible_snapshot();

    let current = snapshot.map(|s| render_current(s, unit, today));

    let (hourly, weekly, forecast_message) = match (snapshot, &state.forecast) {
        (None, _) => (Vec::new(), Vec::new(), None),
        (Some(_), Some(forecast)) if !forecast.days.is_empty() || !forecast.hours.is_empty() => (
            render_hourly(forecast, unit),
            render_weekly(forecast, unit),
            None,
        ),
        (Some(_), _) => (
            Vec::new(),
            Vec::new(),
            Some(NO_FORECAST_MESSAGE.to_string()),
        ),
    };

    let is_favorite = snapshot
        .map(|s| favorites.iter().any(|f| f.matches(&s.city)))
        .unwrap_or(false);

    let error_message = match state.panel {
        PanelState::Error => state.error_message.clone(),
        PanelState::Loading | PanelState::Content => None,
    };

    DashboardView {
        panel: state.panel,
        error_message,
        theme: settings.theme,
        theme_class: settings.theme.css_class().to_string(),
        theme_icon: settings.theme.toggle_icon().to_string(),
        unit,
        unit_label: unit.label().to_string(),
        current,
        hourly,
        weekly,
        forecast_message,
        favorites: favorites.to_vec(),
        favorites_message: favorites
            .is_empty()
            .then(|| NO_FAVORITES_MESSAGE.to_string()),
        is_favorite,
        last_search: state.last_search.clone(),
    }
}

pub fn render_current(
    snapshot: &WeatherSnapshot,
    unit: TemperatureUnit,
    today: NaiveDate,
) -> CurrentView {
    let date = snapshot.local_time.map(|t| t.date()).unwrap_or(today);
    let uv_level = UvLevel::from_index(snapshot.uv_index);
    let category = snapshot.condition.category;

    CurrentView {
        city_name: format!("{}, {}", snapshot.city, snapshot.country),
        date_time: date.format("%A, %B %-d, %Y").to_string(),
        current_temp: format_temperature(snapshot.temperature_c, unit),
        weather_condition: snapshot.condition.text.clone(),
        weather_icon: snapshot.condition.icon.clone(),
        feels_like: format_temperature(snapshot.feels_like_c, unit),
        humidity: format!("{}%", snapshot.humidity.round() as i64),
        wind_speed: format!("{} km/h", snapshot.wind_kph.round() as i64),
        pressure: format!("{} hPa", snapshot.pressure_mb.round() as i64),
        visibility: format!("{} km", snapshot.visibility_km.round() as i64),
        uv_index: snapshot.uv_index.to_string(),
        uv_level,
        uv_class: uv_level.css_class().to_string(),
        background: category,
        background_class: category.background_class().to_string(),
    }
}

/// Up to 24 hours starting at the location's current hour
pub fn render_hourly(forecast: &Forecast, unit: TemperatureUnit) -> Vec<HourlyView> {
    let start = forecast.local_time.map(truncate_to_hour);

    forecast
        .hours
        .iter()
        .filter(|h| start.map_or(true, |s| h.time >= s))
        .take(HOURLY_STRIP_LEN)
        .map(|h| HourlyView {
            time: format_hour(h.time),
            icon: h.condition.icon.clone(),
            condition: h.condition.text.clone(),
            temp: format_temperature(h.temp_c, unit),
        })
        .collect()
}

pub fn render_weekly(forecast: &Forecast, unit: TemperatureUnit) -> Vec<DailyView> {
    forecast
        .days
        .iter()
        .enumerate()
        .map(|(i, d)| DailyView {
            day: if i == 0 {
                "Today".to_string()
            } else {
                d.date.format("%a").to_string()
            },
            icon: d.condition.icon.clone(),
            condition: d.condition.text.clone(),
            high: format_temperature(d.max_c, unit),
            low: format_temperature(d.min_c, unit),
        })
        .collect()
}

/// "25°" style label from a Celsius reading
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}°", unit.from_celsius(celsius).round() as i64)
}

/// "12 AM", "1 PM", ...
pub fn format_hour(time: NaiveDateTime) -> String {
    time.format("%-I %p").to_string()
}

fn truncate_to_hour(time: NaiveDateTime) -> NaiveDateTime {
    time.date()
        .and_hms_opt(time.hour(), 0, 0)
        .unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::fixtures;
    use crate::weather::models::{CurrentResponse, ForecastResponse};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_default()
    }

    fn now() -> NaiveDateTime {
        today().and_hms_opt(9, 30, 0).unwrap_or_default()
    }

    fn paris() -> WeatherSnapshot {
        let response: CurrentResponse =
            serde_json::from_value(fixtures::current_json("Paris", "FR", 25.0))
                .expect("fixture should deserialize");
        response.into()
    }

    fn paris_forecast(days: u64) -> Forecast {
        let response: ForecastResponse =
            serde_json::from_value(fixtures::forecast_json("Paris", "FR", days))
                .expect("fixture should deserialize");
        response.into()
    }

    fn content_state(forecast: Option<Forecast>) -> DashboardState {
        let mut state = DashboardState::default();
        state.enter_loading("Paris");
        state.show_current(paris());
        state.show_forecast(forecast);
        state
    }

    #[test]
    fn test_uv_bands() {
        for (uv, level) in [
            (0.0, UvLevel::Low),
            (2.0, UvLevel::Low),
            (3.0, UvLevel::Moderate),
            (5.0, UvLevel::Moderate),
            (6.0, UvLevel::High),
            (7.0, UvLevel::High),
            (8.0, UvLevel::VeryHigh),
            (11.0, UvLevel::VeryHigh),
        ] {
            assert_eq!(UvLevel::from_index(uv), level, "uv {}", uv);
        }
        assert_eq!(UvLevel::VeryHigh.css_class(), "uv-very-high");
    }

    #[test]
    fn test_uv_level_serializes_kebab_case() {
        let json = serde_json::to_string(&UvLevel::VeryHigh).expect("serialize");
        assert_eq!(json, "\"very-high\"");
    }

    #[test]
    fn test_unit_toggle_round_trip() {
        let snapshot = paris();
        let celsius = render_current(&snapshot, TemperatureUnit::Celsius, today());
        let fahrenheit = render_current(&snapshot, TemperatureUnit::Fahrenheit, today());
        let back = render_current(&snapshot, TemperatureUnit::Celsius, today());

        assert_eq!(celsius.current_temp, "25°");
        assert_eq!(fahrenheit.current_temp, "77°");
        assert_eq!(back.current_temp, "25°");
    }

    #[test]
    fn test_render_current_fields() {
        let view = render_current(&paris(), TemperatureUnit::Celsius, today());

        assert_eq!(view.city_name, "Paris, FR");
        assert_eq!(view.date_time, "Sunday, October 18, 2026");
        assert_eq!(view.feels_like, "27°");
        assert_eq!(view.weather_condition, "Sunny");
        assert_eq!(view.humidity, "78%");
        assert_eq!(view.wind_speed, "12 km/h");
        assert_eq!(view.pressure, "1013 hPa");
        assert_eq!(view.visibility, "10 km");
        assert_eq!(view.uv_index, "6");
        assert_eq!(view.uv_level, UvLevel::High);
        assert_eq!(view.uv_class, "uv-high");
        assert_eq!(view.background, ConditionCategory::Sunny);
    }

    #[test]
    fn test_format_hour_labels() {
        let day = today();
        let at = |h| day.and_hms_opt(h, 0, 0).unwrap_or_default();
        assert_eq!(format_hour(at(0)), "12 AM");
        assert_eq!(format_hour(at(9)), "9 AM");
        assert_eq!(format_hour(at(12)), "12 PM");
        assert_eq!(format_hour(at(23)), "11 PM");
    }

    #[test]
    fn test_hourly_strip_starts_at_local_hour() {
        // Fixture local time is 14:05 on the first day
        let hourly = render_hourly(&paris_forecast(2), TemperatureUnit::Celsius);
        assert_eq!(hourly.len(), 24);
        assert_eq!(hourly[0].time, "2 PM");
        assert_eq!(hourly[23].time, "1 PM");
    }

    #[test]
    fn test_hourly_strip_short_forecast() {
        let hourly = render_hourly(&paris_forecast(1), TemperatureUnit::Celsius);
        assert_eq!(hourly.len(), 10);
    }

    #[test]
    fn test_weekly_labels_and_units() {
        let weekly = render_weekly(&paris_forecast(7), TemperatureUnit::Fahrenheit);
        assert_eq!(weekly.len(), 7);
        assert_eq!(weekly[0].day, "Today");
        assert_eq!(weekly[1].day, "Mon");
        // 24°C max on the first day
        assert_eq!(weekly[0].high, "75°");
    }

    #[test]
    fn test_render_content_with_forecast() {
        let state = content_state(Some(paris_forecast(7)));
        let view = render(&state, &Settings::default(), &[], now());

        assert_eq!(view.panel, PanelState::Content);
        assert!(view.current.is_some());
        assert_eq!(view.weekly.len(), 7);
        assert!(!view.hourly.is_empty());
        assert!(view.forecast_message.is_none());
        assert_eq!(view.favorites_message.as_deref(), Some(NO_FAVORITES_MESSAGE));
    }

    #[test]
    fn test_render_missing_forecast_message() {
        let state = content_state(None);
        let view = render(&state, &Settings::default(), &[], now());

        assert_eq!(
            view.current.as_ref().map(|c| c.city_name.as_str()),
            Some("Paris, FR")
        );
        assert!(view.weekly.is_empty());
        assert!(view.hourly.is_empty());
        assert_eq!(view.forecast_message.as_deref(), Some(NO_FORECAST_MESSAGE));
    }

    #[test]
    fn test_render_error_hides_content() {
        let mut state = content_state(Some(paris_forecast(7)));
        state.enter_loading("Atlantis");
        state.enter_error("City not found: Atlantis");
        let view = render(&state, &Settings::default(), &[], now());

        assert_eq!(view.panel, PanelState::Error);
        assert_eq!(view.error_message.as_deref(), Some("City not found: Atlantis"));
        assert!(view.current.is_none());
        assert!(view.weekly.is_empty());
        assert!(view.forecast_message.is_none());
    }

    #[test]
    fn test_render_loading_shows_nothing_else() {
        let mut state = content_state(None);
        state.enter_loading("Oslo");
        let view = render(&state, &Settings::default(), &[], now());

        assert_eq!(view.panel, PanelState::Loading);
        assert!(view.current.is_none());
        assert!(view.error_message.is_none());
    }

    #[test]
    fn test_render_theme_and_favorites() {
        let state = content_state(None);
        let settings = Settings {
            unit: TemperatureUnit::Fahrenheit,
            theme: Theme::Dark,
        };
        let favorites = vec![FavoriteCity::new("paris", None)];
        let view = render(&state, &settings, &favorites, now());

        assert_eq!(view.theme_class, "dark-theme");
        assert_eq!(view.theme_icon, "fas fa-sun");
        assert_eq!(view.unit_label, "°F");
        assert!(view.is_favorite);
        assert!(view.favorites_message.is_none());
    }

    #[test]
    fn test_current_view_uses_element_id_keys() {
        let view = render_current(&paris(), TemperatureUnit::Celsius, today());
        let json = serde_json::to_value(&view).expect("serialize");
        for key in [
            "cityName",
            "dateTime",
            "currentTemp",
            "weatherCondition",
            "feelsLike",
            "windSpeed",
            "uvIndex",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_demo_view_uses_render_date() {
        let built = NaiveDate::from_ymd_opt(2026, 10, 15)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap_or_default();
        let state = DashboardState::demo(built);

        let view = render(&state, &Settings::default(), &[], now());

        let current = view.current.expect("demo content");
        assert_eq!(current.city_name, "Mumbai, IN");
        assert_eq!(current.date_time, "Sunday, October 18, 2026");
        assert_eq!(view.hourly.first().map(|h| h.time.as_str()), Some("9 AM"));
        assert_eq!(view.weekly.first().map(|d| d.day.as_str()), Some("Today"));
        assert_eq!(view.weekly.get(1).map(|d| d.day.as_str()), Some("Mon"));
    }

    #[test]
    fn test_dashboard_view_uses_camel_case_keys() {
        let view = render(&content_state(None), &Settings::default(), &[], now());
        let json = serde_json::to_value(&view).expect("serialize");
        for key in [
            "themeClass",
            "themeIcon",
            "unitLabel",
            "forecastMessage",
            "favoritesMessage",
            "isFavorite",
            "lastSearch",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert!(json.get("forecast_message").is_none());
    }
}
