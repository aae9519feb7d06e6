//! The weather tool provider: its closed set of queries, the NWS client that
//! answers them, and the MCP server that exposes them.

use rmcp::schemars;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod nws;
pub mod server;

pub use nws::NwsClient;
pub use server::WeatherServer;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WeatherError::UpstreamUnavailable(format!("request timed out: {e}"))
        } else {
            WeatherError::UpstreamUnavailable(e.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AlertsArgs {
    #[schemars(description = "Two-letter US state code (e.g. CA, NY)")]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ForecastArgs {
    #[schemars(description = "Latitude of the location, in degrees")]
    pub latitude: f64,
    #[schemars(description = "Longitude of the location, in degrees")]
    pub longitude: f64,
}

/// One request to the weather data source, one variant per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Alerts(AlertsArgs),
    Forecast(ForecastArgs),
}

impl WeatherQuery {
    pub fn tool_name(&self) -> &'static str {
        match self {
            WeatherQuery::Alerts(_) => "get_alerts",
            WeatherQuery::Forecast(_) => "get_forecast",
        }
    }

    /// Check argument constraints the schema cannot express and normalize them.
    pub fn validate(self) -> Result<Self, WeatherError> {
        match self {
            WeatherQuery::Alerts(AlertsArgs { state }) => {
                let state = state.trim();
                if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(WeatherError::InvalidArgument(format!(
                        "state must be a two-letter code, got '{state}'"
                    )));
                }
                Ok(WeatherQuery::Alerts(AlertsArgs {
                    state: state.to_ascii_uppercase(),
                }))
            }
            WeatherQuery::Forecast(ForecastArgs {
                latitude,
                longitude,
            }) => {
                if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
                    return Err(WeatherError::InvalidArgument(format!(
                        "latitude must be between -90 and 90, got {latitude}"
                    )));
                }
                if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
                    return Err(WeatherError::InvalidArgument(format!(
                        "longitude must be between -180 and 180, got {longitude}"
                    )));
                }
                Ok(WeatherQuery::Forecast(ForecastArgs {
                    latitude,
                    longitude,
                }))
            }
        }
    }
}
