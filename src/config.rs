use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// WeatherAPI key
    pub weatherapi_key: String,

    /// WeatherAPI base URL (without trailing endpoint)
    #[serde(default = "default_base_url")]
    pub weatherapi_base_url: String,

    /// Days requested from the forecast endpoint
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// File holding favorites and settings; empty keeps them in memory only
    #[serde(default = "default_preferences_path")]
    pub preferences_path: String,

    /// Timeout for outbound weather requests
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_forecast_days() -> u8 {
    7
}

fn default_preferences_path() -> String {
    "data/preferences.json".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Start with default values
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("weatherapi_base_url", default_base_url())?
            .set_default("forecast_days", u64::from(default_forecast_days()))?
            .set_default("preferences_path", default_preferences_path())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with WEATHERDASH_)
            .add_source(
                Environment::with_prefix("WEATHERDASH")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.weatherapi_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "weatherapi_key must not be empty".to_string(),
            ));
        }
        if !(1..=14).contains(&self.forecast_days) {
            return Err(ConfigError::Message(format!(
                "forecast_days must be between 1 and 14, got {}",
                self.forecast_days
            )));
        }
        Ok(())
    }
}
