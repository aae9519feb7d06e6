//! Environment-driven settings for both binaries.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::options::{ModelOptions, TransportOptions};
use crate::providers::OllamaModel;
use crate::weather::nws;

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b-instruct-fp16";

/// Instructions that steer the model towards the tools' argument shapes.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a weather agent. You help users by calling the National Weather Service tools.

The tools expect either a two-letter US state code, as in {\"state\": \"CA\"}, \
or the latitude and longitude of a US location, as in \
{\"latitude\": 37.3541, \"longitude\": -122.0277}.

Translate the user's request into one of these shapes. If you cannot work out \
what the user wants, ask for clarification or answer \
'I am not able to interpret the intent of your request'.";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("failed to load .env: {0}")]
    Dotenv(String),
}

/// Load a `.env` file from the working directory or one of its parents.
///
/// Variables already present in the process environment win. A missing file
/// is not an error.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::Dotenv(e.to_string())),
    }
}

/// Settings for the chat client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub model_options: ModelOptions<OllamaModel>,
    pub transport_options: TransportOptions,
}

impl ClientSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = non_empty(lookup("OLLAMA_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string());
        let model =
            non_empty(lookup("OLLAMA_MODEL")).unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());

        let mut model_options =
            ModelOptions::<OllamaModel>::new(model).with_system(DEFAULT_SYSTEM_PROMPT);
        if let Some(raw) = non_empty(lookup("MODEL_TEMPERATURE")) {
            let temperature = raw
                .parse::<f32>()
                .ok()
                .filter(|t| (0.0..=2.0).contains(t))
                .ok_or(ConfigError::Invalid {
                    name: "MODEL_TEMPERATURE",
                    expected: "a number between 0 and 2",
                    value: raw.clone(),
                })?;
            model_options = model_options.with_temperature(temperature);
        }
        if let Some(raw) = non_empty(lookup("MODEL_TOP_P")) {
            let top_p = raw
                .parse::<f32>()
                .ok()
                .filter(|p| *p > 0.0 && *p <= 1.0)
                .ok_or(ConfigError::Invalid {
                    name: "MODEL_TOP_P",
                    expected: "a number in (0, 1]",
                    value: raw.clone(),
                })?;
            model_options = model_options.with_top_p(top_p);
        }
        model_options.provider.keep_alive = non_empty(lookup("OLLAMA_KEEP_ALIVE"));

        let mut transport_options = TransportOptions::new();
        if let Some(timeout) = seconds(&lookup, "OLLAMA_TIMEOUT_SECS")? {
            transport_options = transport_options.with_timeout(timeout);
        }

        Ok(Self {
            base_url,
            model_options,
            transport_options,
        })
    }
}

/// Settings for the weather tool provider.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub api_base: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: non_empty(lookup("NWS_API_BASE"))
                .unwrap_or_else(|| nws::DEFAULT_API_BASE.to_string()),
            user_agent: non_empty(lookup("NWS_USER_AGENT"))
                .unwrap_or_else(|| nws::DEFAULT_USER_AGENT.to_string()),
            timeout: seconds(&lookup, "NWS_TIMEOUT_SECS")?.unwrap_or(nws::DEFAULT_TIMEOUT),
        })
    }

    pub fn transport_options(&self) -> TransportOptions {
        nws::default_transport(&self.user_agent, self.timeout)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    match non_empty(lookup(name)) {
        None => Ok(None),
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
            _ => Err(ConfigError::Invalid {
                name,
                expected: "a positive number of seconds",
                value: raw,
            }),
        },
    }
}
