//! Model runtime provider implementations.

use crate::client::Client;
use crate::options::{ModelOptions, TransportOptions};

/// Trait for model runtimes that can create configured clients.
pub trait Provider {
    /// The client type produced by this provider.
    type Client: Client;

    /// Create a new client for the runtime at `endpoint` using `model`.
    fn create(endpoint: String, model: String) -> Self::Client;

    /// Create a new client with custom options.
    fn create_with_options(
        endpoint: String,
        model_options: ModelOptions<<Self::Client as Client>::ModelProvider>,
        transport_options: TransportOptions,
    ) -> Self::Client;
}

pub mod ollama;

pub use ollama::{Ollama, OllamaClient, OllamaModel};
