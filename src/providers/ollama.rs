//! Ollama API client implementation.

use serde::{Deserialize, Serialize};
use crate::api::openai::{OpenAiCompatibleClient, OpenAiCompatibleModel};
use crate::options::{ModelOptions, TransportOptions};
use crate::providers::Provider;

/// Ollama-specific request fields, flattened into the chat request body.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OllamaModel {
    /// How long the runtime keeps the model loaded after a request (e.g. "5m").
    pub keep_alive: Option<String>,
}

impl OpenAiCompatibleModel for OllamaModel {}

pub type OllamaClient = OpenAiCompatibleClient<OllamaModel>;

pub struct Ollama;

impl Provider for Ollama {
    type Client = OllamaClient;

    fn create(base_url: String, model: String) -> Self::Client {
        OllamaClient::new(
            "ollama".to_string(),
            base_url,
            ModelOptions::new(model),
            TransportOptions::default(),
        )
    }

    fn create_with_options(
        base_url: String,
        model_options: ModelOptions<OllamaModel>,
        transport_options: TransportOptions,
    ) -> Self::Client {
        OllamaClient::new(
            "ollama".to_string(),
            base_url,
            model_options,
            transport_options,
        )
    }
}
