//! National Weather Service API client.

use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{AlertsArgs, ForecastArgs, WeatherError, WeatherQuery};
use crate::http::{add_extra_headers, build_http_client, ResponseExt};
use crate::options::TransportOptions;

pub const DEFAULT_API_BASE: &str = "https://api.weather.gov";
pub const DEFAULT_USER_AGENT: &str = "weather-app/1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of forecast periods rendered.
const FORECAST_PERIODS: usize = 5;

const SEPARATOR: &str = "\n---\n";

#[derive(Debug, Clone)]
pub struct NwsClient {
    base_url: String,
    http: reqwest::Client,
    transport_options: TransportOptions,
}

impl NwsClient {
    pub fn new(base_url: impl Into<String>, transport_options: TransportOptions) -> Result<Self, WeatherError> {
        let http = build_http_client(&transport_options)?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            transport_options,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a validated query and render the result as text.
    pub async fn fetch(&self, query: &WeatherQuery) -> Result<String, WeatherError> {
        match query {
            WeatherQuery::Alerts(args) => self.alerts(args).await,
            WeatherQuery::Forecast(args) => self.forecast(args).await,
        }
    }

    async fn alerts(&self, args: &AlertsArgs) -> Result<String, WeatherError> {
        let url = format!("{}/alerts/active/area/{}", self.base_url, args.state);
        let collection: AlertCollection = self.get_json(&url).await?;

        if collection.features.is_empty() {
            return Ok("No active alerts for this state.".to_string());
        }

        Ok(collection
            .features
            .iter()
            .map(|feature| feature.properties.render())
            .collect::<Vec<_>>()
            .join(SEPARATOR))
    }

    async fn forecast(&self, args: &ForecastArgs) -> Result<String, WeatherError> {
        let points_url = format!(
            "{}/points/{:.4},{:.4}",
            self.base_url, args.latitude, args.longitude
        );
        let points: PointResponse = self.get_json(&points_url).await?;

        let forecast_url = points.properties.forecast.ok_or_else(|| {
            WeatherError::UpstreamUnavailable(
                "no forecast is available for this location".to_string(),
            )
        })?;
        let forecast: ForecastResponse = self.get_json(&forecast_url).await?;

        if forecast.properties.periods.is_empty() {
            return Err(WeatherError::UpstreamUnavailable(
                "forecast contained no periods".to_string(),
            ));
        }

        Ok(forecast
            .properties
            .periods
            .iter()
            .take(FORECAST_PERIODS)
            .map(Period::render)
            .collect::<Vec<_>>()
            .join(SEPARATOR))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        debug!("NWS request: GET {}", url);
        let req = add_extra_headers(self.http.get(url), &self.transport_options);
        let response = req.send().await?;
        let status = response.status();
        let body = response.text_logged().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ProblemDetail>(&body)
                .ok()
                .and_then(|p| p.detail.or(p.title))
                .unwrap_or(body);
            return Err(WeatherError::UpstreamUnavailable(format!(
                "HTTP {status} from {url}: {detail}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::UpstreamUnavailable(format!("unexpected response from {url}: {e}"))
        })
    }
}

/// Transport options carrying the headers the NWS API asks clients to send.
pub fn default_transport(user_agent: &str, timeout: Duration) -> TransportOptions {
    TransportOptions::new()
        .with_timeout(timeout)
        .with_header(USER_AGENT.as_str().to_string(), user_agent.to_string())
        .with_header(ACCEPT.as_str().to_string(), "application/geo+json".to_string())
}

#[derive(Debug, Deserialize)]
struct AlertCollection {
    #[serde(default)]
    features: Vec<AlertFeature>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    properties: AlertProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertProperties {
    event: Option<String>,
    area_desc: Option<String>,
    severity: Option<String>,
    description: Option<String>,
    instruction: Option<String>,
}

impl AlertProperties {
    fn render(&self) -> String {
        format!(
            "Event: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}",
            self.event.as_deref().unwrap_or("Unknown"),
            self.area_desc.as_deref().unwrap_or("Unknown"),
            self.severity.as_deref().unwrap_or("Unknown"),
            self.description
                .as_deref()
                .unwrap_or("No description available"),
            self.instruction
                .as_deref()
                .unwrap_or("No specific instructions provided"),
        )
    }
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
struct PointProperties {
    forecast: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<Period>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Period {
    name: String,
    #[serde(default)]
    temperature: Value,
    temperature_unit: Option<String>,
    wind_speed: Option<String>,
    wind_direction: Option<String>,
    detailed_forecast: Option<String>,
}

impl Period {
    fn render(&self) -> String {
        // Newer API responses wrap values as {"unitCode": ..., "value": ...}.
        let temperature = match &self.temperature {
            Value::Object(map) => map.get("value").cloned().unwrap_or(Value::Null),
            other => other.clone(),
        };
        let temperature = match temperature {
            Value::Null => "?".to_string(),
            Value::String(s) => s,
            other => other.to_string(),
        };

        format!(
            "{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}",
            self.name,
            temperature,
            self.temperature_unit.as_deref().unwrap_or(""),
            self.wind_speed.as_deref().unwrap_or("unknown"),
            self.wind_direction.as_deref().unwrap_or(""),
            self.detailed_forecast.as_deref().unwrap_or("No forecast text"),
        )
    }
}

#[derive(Debug, Deserialize)]
struct ProblemDetail {
    title: Option<String>,
    detail: Option<String>,
}
