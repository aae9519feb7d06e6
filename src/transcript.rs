//! In-memory conversation transcript.

use crate::model::{Message, Part};
use crate::tools::ToolInvocation;

/// Ordered turn history of one session. Only grows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    /// Append the model's reply, optionally carrying the one call it made.
    pub fn push_assistant(&mut self, text: Option<String>, call: Option<&ToolInvocation>) {
        let mut parts = Vec::new();
        if let Some(text) = text {
            parts.push(Part::Text(text));
        }
        if let Some(call) = call {
            parts.push(call.to_part());
        }
        self.messages.push(Message::Assistant(parts));
    }

    pub fn push_tool_result(&mut self, result: Part) {
        self.messages.push(Message::User(vec![result]));
    }

    /// Call ids that have no tool result yet.
    pub fn outstanding_calls(&self) -> Vec<String> {
        let mut pending: Vec<String> = Vec::new();
        for msg in &self.messages {
            for part in msg.parts() {
                match part {
                    Part::FunctionCall { id, .. } => {
                        pending.push(id.clone().unwrap_or_default());
                    }
                    Part::FunctionResponse { id, .. } => {
                        let id = id.clone().unwrap_or_default();
                        if let Some(pos) = pending.iter().position(|p| *p == id) {
                            pending.remove(pos);
                        }
                    }
                    Part::Text(_) => {}
                }
            }
        }
        pending
    }

    /// True when every tool call is answered by exactly one result before the
    /// next user text turn.
    pub fn is_balanced(&self) -> bool {
        let mut pending: Option<String> = None;
        for msg in &self.messages {
            for part in msg.parts() {
                match part {
                    Part::FunctionCall { id, .. } => {
                        if pending.is_some() {
                            return false;
                        }
                        pending = Some(id.clone().unwrap_or_default());
                    }
                    Part::FunctionResponse { id, .. } => {
                        if pending.take() != Some(id.clone().unwrap_or_default()) {
                            return false;
                        }
                    }
                    Part::Text(_) => {
                        if matches!(msg, Message::User(_)) && pending.is_some() {
                            return false;
                        }
                    }
                }
            }
        }
        pending.is_none()
    }
}
