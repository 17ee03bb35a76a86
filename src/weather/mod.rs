pub mod handlers;
pub mod models;
pub mod service;

#[cfg(test)]
pub mod fixtures;

pub use models::{Forecast, WeatherSnapshot};
pub use service::{WeatherError, WeatherService};
