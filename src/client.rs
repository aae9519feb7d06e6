//! Core model client trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Message, Response};
use crate::options::{ModelOptions, TransportOptions};
use crate::tools::ToolDescriptor;

/// Errors that can occur while talking to the model runtime.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Main client trait for model runtimes.
#[async_trait]
pub trait Client: Send + Sync {
    /// Provider-specific model options type.
    type ModelProvider: Send + Sync;

    /// Send the conversation and the advertised tools to the model.
    async fn request(
        &self,
        messages: Vec<Message>,
        tools: &[ToolDescriptor],
    ) -> Result<Response, ClientError>;

    /// Check that the runtime is reachable before the first turn.
    async fn probe(&self) -> Result<(), ClientError> {
        Ok(())
    }

    /// Get reference to the model options.
    fn model_options(&self) -> &ModelOptions<Self::ModelProvider>;

    /// Get reference to the transport options.
    fn transport_options(&self) -> &TransportOptions;
}
