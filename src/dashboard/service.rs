use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use super::state::DashboardState;
use super::view::{self, DashboardView};
use crate::preferences::{FavoriteCity, PreferenceStore};
use crate::weather::{WeatherError, WeatherService};

/// The dashboard's application context
///
/// Owns what is on screen and the last search, and routes user actions
/// through the weather client and the preference store. Starting a search
/// cancels the one in flight, so the latest search always wins.
pub struct Dashboard {
    weather: Arc<WeatherService>,
    preferences: Arc<PreferenceStore>,
    forecast_days: u8,
    state: RwLock<DashboardState>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl Dashboard {
    pub fn new(
        weather: Arc<WeatherService>,
        preferences: Arc<PreferenceStore>,
        forecast_days: u8,
    ) -> Self {
        Self {
            weather,
            preferences,
            forecast_days,
            state: RwLock::new(DashboardState::demo(chrono::Local::now().naive_local())),
            in_flight: Mutex::new(None),
        }
    }

    /// Render the current state
    pub async fn view(&self) -> DashboardView {
        let settings = self.preferences.get_settings().await;
        let favorites = self.preferences.get_favorites().await;
        let state = self.state.read().await;
        view::render(
            &state,
            &settings,
            &favorites,
            chrono::Local::now().naive_local(),
        )
    }

    /// Look up a city: current conditions first, then the forecast
    ///
    /// Blank input is ignored. A failed current-conditions request shows the
    /// error panel; a failed forecast only empties the forecast area.
    pub async fn search(&self, city: &str) -> DashboardView {
        let city = city.trim();
        if city.is_empty() {
            tracing::debug!("Ignoring empty search");
            return self.view().await;
        }

        let token = self.begin_search().await;
        if !self.commit(&token, |s| s.enter_loading(city)).await {
            return self.superseded(city).await;
        }
        tracing::info!(city = %city, "Searching weather");

        let current = tokio::select! {
            _ = token.cancelled() => return self.superseded(city).await,
            result = self.weather.get_current(city) => result,
        };

        let snapshot = match current {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(city = %city, error = %e, "Weather lookup failed");
                let message = error_message(&e);
                self.commit(&token, |s| s.enter_error(message)).await;
                return self.view().await;
            }
        };

        if !self.commit(&token, |s| s.show_current(snapshot)).await {
            return self.superseded(city).await;
        }

        let forecast = tokio::select! {
            _ = token.cancelled() => return self.superseded(city).await,
            result = self.weather.get_forecast(city, self.forecast_days) => result,
        };

        let forecast = match forecast {
            Ok(forecast) => Some(forecast),
            Err(e) => {
                tracing::warn!(city = %city, error = %e, "Forecast unavailable");
                None
            }
        };
        self.commit(&token, |s| s.show_forecast(forecast)).await;

        self.view().await
    }

    /// Re-run the last search, or show the demo data if there was none
    pub async fn retry(&self) -> DashboardView {
        let last_search = self.state.read().await.last_search.clone();
        match last_search {
            Some(city) => self.search(&city).await,
            None => self.show_demo().await,
        }
    }

    /// Switch between Celsius and Fahrenheit, then refresh what is shown
    pub async fn toggle_unit(&self) -> DashboardView {
        let settings = self
            .preferences
            .update_settings(|s| s.unit = s.unit.toggled())
            .await;
        tracing::info!(unit = ?settings.unit, "Temperature unit changed");

        self.retry().await
    }

    pub async fn toggle_theme(&self) -> DashboardView {
        let settings = self
            .preferences
            .update_settings(|s| s.theme = s.theme.toggled())
            .await;
        tracing::info!(theme = ?settings.theme, "Theme changed");

        self.view().await
    }

    /// Add the displayed city to favorites, or remove it if already saved
    pub async fn toggle_favorite(&self) -> DashboardView {
        let city = {
            let state = self.state.read().await;
            state
                .visible_snapshot()
                .map(|s| FavoriteCity::new(s.city.clone(), Some(s.country.clone())))
        };

        match city {
            Some(city) => {
                if !self.preferences.remove_favorite(&city.name).await {
                    self.preferences.add_favorite(city).await;
                }
            }
            None => tracing::debug!("No city displayed, nothing to favorite"),
        }

        self.view().await
    }

    async fn show_demo(&self) -> DashboardView {
        // A demo refresh also supersedes any search still running
        let token = self.begin_search().await;
        let now = chrono::Local::now().naive_local();
        self.commit(&token, |s| s.show_demo(now)).await;
        self.view().await
    }

    /// Cancel the search in flight, if any, and register a new one
    async fn begin_search(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut in_flight = self.in_flight.lock().await;
        if let Some(previous) = in_flight.replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Apply `update` unless the search was superseded. Returns whether it was applied.
    async fn commit(
        &self,
        token: &CancellationToken,
        update: impl FnOnce(&mut DashboardState),
    ) -> bool {
        let mut state = self.state.write().await;
        if token.is_cancelled() {
            return false;
        }
        update(&mut state);
        true
    }

    async fn superseded(&self, city: &str) -> DashboardView {
        tracing::debug!(city = %city, "Search superseded by a newer one");
        self.view().await
    }
}

/// Message shown on the error panel
fn error_message(err: &WeatherError) -> String {
    match err {
        WeatherError::CityNotFound(city) => {
            format!("City \"{}\" not found. Check the spelling and try again.", city)
        }
        WeatherError::RequestError(_) => {
            "Unable to fetch weather data. Check your connection and try again.".to_string()
        }
        other => other.to_string(),
    }
}
