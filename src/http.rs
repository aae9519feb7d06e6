//! HTTP plumbing shared by the Ollama chat client and the NWS client.
//!
//! Both sides build their `reqwest::Client` from [`TransportOptions`] and log
//! bodies at `debug` level, which is where `RUST_LOG=debug` shows the raw
//! chat completions and NWS GeoJSON.

use reqwest::{Client, RequestBuilder};
use tracing::debug;

use crate::client::ClientError;
use crate::options::TransportOptions;

/// Build an HTTP client honouring the timeout and proxy in `transport_options`.
/// A malformed proxy URL is an error.
pub fn build_http_client(transport_options: &TransportOptions) -> Result<Client, reqwest::Error> {
    let TransportOptions::Http { timeout, proxy, .. } = transport_options;

    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(*timeout);
    }
    if let Some(proxy_url) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }
    builder.build()
}

/// Attach the configured extra headers (e.g. the NWS `User-Agent`) to `request`.
pub fn add_extra_headers(
    request: RequestBuilder,
    transport_options: &TransportOptions,
) -> RequestBuilder {
    let TransportOptions::Http { headers, .. } = transport_options;
    headers
        .iter()
        .flatten()
        .fold(request, |request, (key, value)| request.header(key, value))
}

pub trait RequestBuilderExt {
    /// Set a JSON body, logging it first.
    fn json_logged<T: serde::Serialize + ?Sized>(self, json: &T) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn json_logged<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        if let Ok(req_body) = serde_json::to_string_pretty(json) {
            debug!("Request body ({} bytes):\n{}", req_body.len(), req_body);
        }

        self.json(json)
    }
}

/// Body readers that log what they read.
#[async_trait::async_trait]
pub trait ResponseExt {
    async fn text_logged(self) -> Result<String, reqwest::Error>;

    /// Decode a chat-completions body; NWS bodies go through `text_logged`.
    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError>;
}

#[async_trait::async_trait]
impl ResponseExt for reqwest::Response {
    async fn text_logged(self) -> Result<String, reqwest::Error> {
        let url = self.url().clone();
        let text = self.text().await?;
        debug!("Response from {} ({} bytes):\n{}", url, text.len(), text);
        Ok(text)
    }

    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError> {
        let text = self.text_logged().await?;
        serde_json::from_str(&text).map_err(ClientError::from)
    }
}
