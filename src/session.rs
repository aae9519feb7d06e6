//! Chat session driving the model query / tool dispatch loop.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::{Client, ClientError};
use crate::mcp::{ConnectError, McpServer};
use crate::model::{Message, Part, Response, Usage};
use crate::tools::{ToolDescriptor, ToolError, ToolInvocation};
use crate::transcript::Transcript;

#[derive(Debug, Error)]
pub enum ChatError {
    /// The model runtime failed this turn. The session can continue.
    #[error("model request failed: {0}")]
    Model(#[from] ClientError),

    /// The tool provider went away. The session cannot continue.
    #[error("tool provider connection lost: {0}")]
    ConnectionLost(String),

    #[error(transparent)]
    Connect(#[from] ConnectError),
}

impl ChatError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ChatError::Model(_))
    }
}

/// What one user turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// The tool call made during the turn, with its arguments.
    pub tool_call: Option<ToolInvocation>,
    /// Whether the tool result was an error.
    pub tool_failed: bool,
    /// The model's final answer.
    pub answer: String,
}

/// Per-turn states. `AWAITING_INPUT` and session end live in the REPL.
#[derive(Debug)]
enum TurnState {
    ModelQuery { reentry: bool },
    ToolDispatch(ToolInvocation),
    DisplayAnswer(String),
}

/// One conversation with one tool provider.
///
/// Each turn resolves at most one tool call: the model is queried, a requested
/// tool is run, its result appended, and the model queried once more without
/// tools for the final answer.
pub struct Session<C: Client, S: McpServer> {
    client: C,
    server: S,
    tools: Vec<ToolDescriptor>,
    transcript: Transcript,
}

impl<C: Client, S: McpServer> Session<C, S> {
    /// Start a session, fetching the provider's tool list once.
    pub async fn start(client: C, server: S) -> Result<Self, ChatError> {
        let tools = server
            .list_tools()
            .await
            .map_err(|e| ChatError::ConnectionLost(e.to_string()))?;
        debug!("Provider advertises {} tools", tools.len());

        let transcript = match &client.model_options().system {
            Some(system) => Transcript::with_system(system.clone()),
            None => Transcript::new(),
        };

        Ok(Self {
            client,
            server,
            tools,
            transcript,
        })
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Tear the session down, handing back the provider connection.
    pub fn into_server(self) -> S {
        self.server
    }

    /// Resolve one user turn.
    ///
    /// The turn works on a copy of the transcript that is committed only when
    /// an answer is produced, so a failed turn leaves no partial state behind.
    pub async fn turn(&mut self, input: &str) -> Result<TurnOutcome, ChatError> {
        let mut scratch = self.transcript.clone();
        scratch.push_user(input);

        let mut state = TurnState::ModelQuery { reentry: false };
        let mut tool_call = None;
        let mut tool_failed = false;
        let mut usage = Usage::default();

        loop {
            state = match state {
                TurnState::ModelQuery { reentry } => {
                    let tools: &[ToolDescriptor] = if reentry { &[] } else { &self.tools };
                    debug!(
                        "Querying model with {} messages, {} tools",
                        scratch.len(),
                        tools.len()
                    );
                    let response = self
                        .client
                        .request(scratch.messages().to_vec(), tools)
                        .await?;
                    if let Some(u) = &response.usage {
                        usage += u.clone();
                    }

                    let (text, call) = split_response(response);
                    match call {
                        Some(call) if !reentry => {
                            info!("Tool call requested: {}", call.name);
                            debug!("Tool arguments: {}", call.arguments);
                            scratch.push_assistant(text, Some(&call));
                            TurnState::ToolDispatch(call)
                        }
                        Some(call) => {
                            warn!(
                                "Ignoring chained tool call to {} after a tool result",
                                call.name
                            );
                            scratch.push_assistant(text.clone(), None);
                            TurnState::DisplayAnswer(text.unwrap_or_default())
                        }
                        None => {
                            scratch.push_assistant(text.clone(), None);
                            TurnState::DisplayAnswer(text.unwrap_or_default())
                        }
                    }
                }
                TurnState::ToolDispatch(call) => {
                    let outcome = self.dispatch(&call).await;
                    match &outcome {
                        Ok(_) => info!("Tool {} executed successfully", call.name),
                        Err(ToolError::ConnectionLost(reason)) => {
                            return Err(ChatError::ConnectionLost(reason.clone()));
                        }
                        Err(e) => {
                            warn!("Tool {} execution failed: {}", call.name, e);
                            tool_failed = true;
                        }
                    }
                    scratch.push_tool_result(call.result_part(&outcome));
                    tool_call = Some(call);
                    TurnState::ModelQuery { reentry: true }
                }
                TurnState::DisplayAnswer(answer) => {
                    debug!(
                        "Turn complete (prompt tokens: {:?}, completion tokens: {:?})",
                        usage.prompt_tokens, usage.completion_tokens
                    );
                    self.transcript = scratch;
                    return Ok(TurnOutcome {
                        tool_call,
                        tool_failed,
                        answer,
                    });
                }
            };
        }
    }

    async fn dispatch(&self, call: &ToolInvocation) -> Result<String, ToolError> {
        let args = call.validate(&self.tools)?;
        self.server.call_tool(&call.name, args).await
    }
}

/// Separate a response into its text and its first tool call.
fn split_response(response: Response) -> (Option<String>, Option<ToolInvocation>) {
    let mut texts = Vec::new();
    let mut calls = Vec::new();

    for msg in &response.data {
        if let Message::Assistant(parts) = msg {
            for part in parts {
                match part {
                    Part::Text(text) => texts.push(text.clone()),
                    Part::FunctionCall { .. } => calls.extend(ToolInvocation::from_part(part)),
                    Part::FunctionResponse { .. } => {}
                }
            }
        }
    }

    if calls.len() > 1 {
        warn!(
            "Model requested {} tool calls; only the first is dispatched",
            calls.len()
        );
    }

    let text = if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    };
    (text, calls.into_iter().next())
}
