//! Tool descriptors, invocation requests and tool errors as seen by the chat client.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::model::Part;

/// Error type for tool execution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    /// The call named an unknown tool or carried arguments that do not fit its schema.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The provider could not reach its data source.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The provider process went away.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
}

/// A tool as advertised by the provider at connection time.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: Option<String>,
    /// JSON Schema object describing the arguments.
    pub input_schema: Map<String, Value>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            input_schema: match input_schema {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }
}

impl From<rmcp::model::Tool> for ToolDescriptor {
    fn from(tool: rmcp::model::Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool.description.map(|d| d.to_string()),
            input_schema: (*tool.input_schema).clone(),
        }
    }
}

/// A model-produced request to run one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolInvocation {
    /// Extract an invocation from a `Part::FunctionCall`.
    ///
    /// A missing call id is replaced by a fresh UUID so the result can be
    /// matched to the call in the transcript.
    pub fn from_part(part: &Part) -> Option<Self> {
        match part {
            Part::FunctionCall {
                id,
                name,
                arguments,
            } => Some(Self {
                id: id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                name: name.clone(),
                arguments: arguments.clone(),
            }),
            _ => None,
        }
    }

    /// Check the call against the advertised tools and return its argument object.
    pub fn validate(&self, tools: &[ToolDescriptor]) -> Result<Map<String, Value>, ToolError> {
        if !tools.iter().any(|tool| tool.name == self.name) {
            return Err(ToolError::InvalidArgument(format!(
                "unknown tool '{}'",
                self.name
            )));
        }

        match &self.arguments {
            Value::Object(map) => Ok(map.clone()),
            Value::Null => Ok(Map::new()),
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => Ok(map),
                _ => Err(ToolError::InvalidArgument(format!(
                    "arguments for '{}' are not a JSON object",
                    self.name
                ))),
            },
            other => Err(ToolError::InvalidArgument(format!(
                "arguments for '{}' must be an object, got {}",
                self.name, other
            ))),
        }
    }

    /// Arguments as shown to the user: JSON-encoded objects are decoded and
    /// any other string is shown verbatim, without JSON quoting.
    pub fn display_arguments(&self) -> String {
        match &self.arguments {
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(value @ Value::Object(_)) => value.to_string(),
                _ => raw.clone(),
            },
            other => other.to_string(),
        }
    }

    pub fn to_part(&self) -> Part {
        Part::FunctionCall {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            arguments: self.arguments.clone(),
        }
    }

    /// Build the tool-result part answering this call.
    pub fn result_part(&self, outcome: &Result<String, ToolError>) -> Part {
        let (content, is_error) = match outcome {
            Ok(text) => (text.clone(), false),
            Err(e) => (e.to_string(), true),
        };

        Part::FunctionResponse {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            content,
            is_error,
        }
    }
}
