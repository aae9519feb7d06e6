//! Conversation messages and model responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::{Add, AddAssign};

/// A single piece of message content.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Plain text.
    Text(String),

    /// A tool invocation requested by the model.
    FunctionCall {
        id: Option<String>,
        name: String,
        arguments: Value,
    },

    /// The outcome of a tool invocation.
    ///
    /// `is_error` is set when `content` describes a failure rather than data.
    FunctionResponse {
        id: Option<String>,
        name: String,
        content: String,
        is_error: bool,
    },
}

/// A conversation message. Tool results travel as user messages holding a
/// single `Part::FunctionResponse`.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    System(Vec<Part>),
    User(Vec<Part>),
    Assistant(Vec<Part>),
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Message::System(vec![Part::Text(text.into())])
    }

    pub fn user(text: impl Into<String>) -> Self {
        Message::User(vec![Part::Text(text.into())])
    }

    pub fn parts(&self) -> &[Part] {
        match self {
            Message::System(parts) | Message::User(parts) | Message::Assistant(parts) => parts,
        }
    }

    /// Concatenated text parts, or `None` if the message has no text.
    pub fn content(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts()
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }

    /// True if this message carries a tool result.
    pub fn is_tool_result(&self) -> bool {
        self.parts()
            .iter()
            .any(|part| matches!(part, Part::FunctionResponse { .. }))
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FinishReason {
    #[default]
    Stop,
    OutputTokens,
    ContentFilter,
    ToolCalls,
}

/// Token accounting reported by the model runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

impl Add for Usage {
    type Output = Usage;

    fn add(self, other: Usage) -> Usage {
        fn sum(a: Option<u32>, b: Option<u32>) -> Option<u32> {
            match (a, b) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or(0) + b.unwrap_or(0)),
            }
        }

        Usage {
            prompt_tokens: sum(self.prompt_tokens, other.prompt_tokens),
            completion_tokens: sum(self.completion_tokens, other.completion_tokens),
        }
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, other: Usage) {
        *self = self.clone() + other;
    }
}

/// A single (non-streaming) model response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub data: Vec<Message>,
    pub usage: Option<Usage>,
    pub finish: FinishReason,
}

impl Response {
    /// Build a response holding one assistant message.
    pub fn assistant(parts: Vec<Part>) -> Self {
        let finish = if parts
            .iter()
            .any(|part| matches!(part, Part::FunctionCall { .. }))
        {
            FinishReason::ToolCalls
        } else {
            FinishReason::Stop
        };

        Response {
            data: vec![Message::Assistant(parts)],
            usage: None,
            finish,
        }
    }
}
