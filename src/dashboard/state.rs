use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::demo;
use crate::weather::{Forecast, WeatherSnapshot};

/// Which of the three panels is visible. Exactly one is shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    Loading,
    Error,
    #[default]
    Content,
}

/// What the dashboard currently shows
///
/// Transitions:
/// `Loading -> Content` on fetch success, `Loading -> Error` on failure,
/// `Content | Error -> Loading` on a new search or retry.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub panel: PanelState,
    pub error_message: Option<String>,
    pub snapshot: Option<WeatherSnapshot>,
    /// `None` once the snapshot is shown means the forecast is missing or failed
    pub forecast: Option<Forecast>,
    pub last_search: Option<String>,
    /// The snapshot and forecast are demo data, regenerated for each render time
    pub demo: bool,
}

impl DashboardState {
    /// Initial page: demo content, no search yet
    pub fn demo(now: NaiveDateTime) -> Self {
        let mut state = Self::default();
        state.show_demo(now);
        state
    }

    pub fn show_demo(&mut self, now: NaiveDateTime) {
        self.panel = PanelState::Content;
        self.error_message = None;
        self.demo = true;
        self.fill_demo(now);
    }

    fn fill_demo(&mut self, now: NaiveDateTime) {
        self.snapshot = Some(demo::snapshot(now));
        self.forecast = Some(demo::forecast(now));
    }

    /// This state as seen at `now`. Demo data is rebuilt so its date,
    /// hourly strip and weekday labels follow the clock.
    pub fn at(&self, now: NaiveDateTime) -> Cow<'_, Self> {
        if !self.demo {
            return Cow::Borrowed(self);
        }
        let mut state = self.clone();
        state.fill_demo(now);
        Cow::Owned(state)
    }

    pub fn enter_loading(&mut self, city: &str) {
        self.panel = PanelState::Loading;
        self.error_message = None;
        self.demo = false;
        self.last_search = Some(city.to_string());
    }

    pub fn enter_error(&mut self, message: impl Into<String>) {
        self.panel = PanelState::Error;
        self.error_message = Some(message.into());
    }

    /// Replace the displayed conditions; the previous forecast is discarded
    pub fn show_current(&mut self, snapshot: WeatherSnapshot) {
        self.panel = PanelState::Content;
        self.error_message = None;
        self.demo = false;
        self.snapshot = Some(snapshot);
        self.forecast = None;
    }

    pub fn show_forecast(&mut self, forecast: Option<Forecast>) {
        self.forecast = forecast;
    }

    /// The snapshot, only while the content panel is visible
    pub fn visible_snapshot(&self) -> Option<&WeatherSnapshot> {
        match self.panel {
            PanelState::Content => self.snapshot.as_ref(),
            PanelState::Loading | PanelState::Error => None,
        }
    }
}
