//! Placeholder data shown before the first search

use chrono::{Days, NaiveDateTime, Timelike};

use crate::weather::models::{Condition, Forecast, ForecastDay, ForecastHour, WeatherSnapshot};

const ICON_BASE: &str = "https://cdn.weatherapi.com/weather/64x64/day";

const WEEK_CONDITIONS: [(&str, u16); 5] = [
    ("Clear Sky", 113),
    ("Partly Cloudy", 116),
    ("Cloudy", 119),
    ("Light Rain", 296),
    ("Sunny", 113),
];

fn condition(text: &str, code: u16) -> Condition {
    Condition::new(text, format!("{}/{}.png", ICON_BASE, code))
}

pub fn snapshot(now: NaiveDateTime) -> WeatherSnapshot {
    WeatherSnapshot {
        city: "Mumbai".to_string(),
        country: "IN".to_string(),
        temperature_c: 28.0,
        feels_like_c: 32.0,
        condition: condition("Partly Cloudy", 116),
        humidity: 78.0,
        wind_kph: 12.0,
        pressure_mb: 1013.0,
        visibility_km: 8.0,
        uv_index: 6.0,
        local_time: Some(now),
    }
}

pub fn forecast(now: NaiveDateTime) -> Forecast {
    let start = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);

    let hours = (0..24)
        .map(|i| ForecastHour {
            time: start + chrono::Duration::hours(i),
            condition: condition("Partly Cloudy", 116),
            temp_c: 28.0 + (i as f64 * 0.3).sin() * 5.0,
        })
        .collect();

    let days = (0..7u64)
        .map(|i| {
            let (text, code) = WEEK_CONDITIONS[i as usize % WEEK_CONDITIONS.len()];
            let high = 25.0 + ((i * 3) % 10) as f64;
            ForecastDay {
                date: now.date() + Days::new(i),
                condition: condition(text, code),
                max_c: high,
                min_c: high - 5.0 - (i % 3) as f64,
            }
        })
        .collect();

    Forecast {
        city: "Mumbai".to_string(),
        country: "IN".to_string(),
        local_time: Some(now),
        days,
        hours,
    }
}
