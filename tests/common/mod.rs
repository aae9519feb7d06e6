#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use weather_mcp::client::{Client, ClientError};
use weather_mcp::mcp::McpServer;
use weather_mcp::model::{Message, Part, Response};
use weather_mcp::options::{ModelOptions, TransportOptions};
use weather_mcp::tools::{ToolDescriptor, ToolError};

/// One recorded model request.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
}

/// Model client replaying scripted responses.
#[derive(Clone)]
pub struct MockClient {
    responses: Arc<Mutex<Vec<Result<Response, String>>>>,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
    model_options: ModelOptions<()>,
    transport_options: TransportOptions,
}

impl MockClient {
    pub fn new(responses: Vec<Response>) -> Self {
        Self::scripted(responses.into_iter().map(Ok).collect())
    }

    /// `Err` entries make the request fail with a provider error.
    pub fn scripted(responses: Vec<Result<Response, String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
            model_options: ModelOptions::new("mock-model"),
            transport_options: TransportOptions::default(),
        }
    }

    pub fn with_system(mut self, system: &str) -> Self {
        self.model_options = self.model_options.with_system(system);
        self
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Client for MockClient {
    type ModelProvider = ();

    async fn request(
        &self,
        messages: Vec<Message>,
        tools: &[ToolDescriptor],
    ) -> Result<Response, ClientError> {
        self.requests.lock().unwrap().push(Recorded {
            messages,
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
        });
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ClientError::ProviderError(
                "No more mock responses".to_string(),
            ));
        }
        responses.remove(0).map_err(ClientError::ProviderError)
    }

    fn model_options(&self) -> &ModelOptions<Self::ModelProvider> {
        &self.model_options
    }

    fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }
}

/// In-memory tool provider with canned results.
#[derive(Clone)]
pub struct MockServer {
    tools: Vec<ToolDescriptor>,
    results: Arc<Mutex<Vec<Result<String, ToolError>>>>,
    pub calls: Arc<Mutex<Vec<(String, Map<String, Value>)>>>,
}

impl MockServer {
    pub fn new(results: Vec<Result<String, ToolError>>) -> Self {
        Self {
            tools: weather_tools(),
            results: Arc::new(Mutex::new(results)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl McpServer for MockServer {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(&self, name: &str, args: Map<String, Value>) -> Result<String, ToolError> {
        self.calls.lock().unwrap().push((name.to_string(), args));
        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            return Err(ToolError::ConnectionLost("no more mock results".into()));
        }
        results.remove(0)
    }
}

pub fn weather_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "get_alerts",
            "Get active weather alerts for a US state",
            serde_json::json!({
                "type": "object",
                "properties": {"state": {"type": "string"}},
                "required": ["state"]
            }),
        ),
        ToolDescriptor::new(
            "get_forecast",
            "Get the weather forecast for a location in the US",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "latitude": {"type": "number"},
                    "longitude": {"type": "number"}
                },
                "required": ["latitude", "longitude"]
            }),
        ),
    ]
}

pub fn text(content: &str) -> Response {
    Response::assistant(vec![Part::Text(content.to_string())])
}

pub fn tool_call(id: Option<&str>, name: &str, arguments: Value) -> Response {
    Response::assistant(vec![Part::FunctionCall {
        id: id.map(str::to_string),
        name: name.to_string(),
        arguments,
    }])
}

/// The tool-result part of a message, if it has one.
pub fn tool_result(msg: &Message) -> Option<(&str, bool)> {
    msg.parts().iter().find_map(|part| match part {
        Part::FunctionResponse {
            content, is_error, ..
        } => Some((content.as_str(), *is_error)),
        _ => None,
    })
}
