//! Canned WeatherAPI payloads shared by tests

use chrono::{Days, NaiveDate};
use serde_json::{json, Value};

pub const LOCAL_TIME: &str = "2026-10-18 14:05";

fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_default()
}

fn location(name: &str, country: &str) -> Value {
    json!({
        "name": name,
        "region": "",
        "country": country,
        "lat": 48.87,
        "lon": 2.33,
        "tz_id": "Europe/Paris",
        "localtime_epoch": 1_792_325_100_i64,
        "localtime": LOCAL_TIME
    })
}

pub fn current_json(name: &str, country: &str, temp_c: f64) -> Value {
    json!({
        "location": location(name, country),
        "current": {
            "temp_c": temp_c,
            "temp_f": temp_c * 9.0 / 5.0 + 32.0,
            "condition": {
                "text": "Sunny",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png",
                "code": 1000
            },
            "wind_kph": 12.0,
            "pressure_mb": 1013.0,
            "humidity": 78,
            "feelslike_c": temp_c + 2.0,
            "vis_km": 10.0,
            "uv": 6.0
        }
    })
}

pub fn forecast_json(name: &str, country: &str, days: u64) -> Value {
    let forecastday: Vec<Value> = (0..days)
        .map(|i| {
            let date = first_day() + Days::new(i);
            let text = if i % 2 == 0 { "Sunny" } else { "Moderate rain" };
            let hours: Vec<Value> = (0..24)
                .map(|h| {
                    json!({
                        "time": format!("{} {:02}:00", date, h),
                        "temp_c": 15.0 + h as f64 / 2.0,
                        "condition": {
                            "text": text,
                            "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png"
                        }
                    })
                })
                .collect();
            json!({
                "date": date.to_string(),
                "day": {
                    "maxtemp_c": 24.0 + i as f64,
                    "mintemp_c": 12.0 + i as f64,
                    "condition": {
                        "text": text,
                        "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png"
                    }
                },
                "hour": hours
            })
        })
        .collect();

    json!({
        "location": location(name, country),
        "current": current_json(name, country, 20.0)["current"].clone(),
        "forecast": { "forecastday": forecastday }
    })
}

pub fn not_found_json() -> Value {
    json!({ "error": { "code": 1006, "message": "No matching location found." } })
}
