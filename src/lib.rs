//! # weather-mcp
//!
//! A command-line chat client that lets a local language model call weather
//! tools during a conversation, plus the MCP server providing those tools.
//!
//! ## Architecture
//!
//! Two processes cooperate:
//!
//! 1. **`weather-server`** is an MCP server on stdio. It exposes `get_alerts`
//!    and `get_forecast`, both answered from the National Weather Service API.
//! 2. **`weather-client`** launches the server as a child process, lists its
//!    tools once and runs a chat loop against an Ollama model runtime.
//!
//! Each user turn goes through [`Session::turn`]: the model is queried with the
//! transcript and the tool list; if it asks for a tool the call is validated,
//! executed on the provider, its result appended, and the model queried once
//! more for the final answer.
//!
//! ### Core Types
//!
//! - **`Client`**: trait for model runtimes ([`providers::OllamaClient`]).
//! - **`McpServer`**: trait for tool providers (an rmcp client connection).
//! - **`Session`**: one conversation and its [`Transcript`].
//! - **`WeatherServer`**: the provider's MCP handler.
//!
//! ## Example
//! ```no_run
//! use std::path::Path;
//! use weather_mcp::providers::{Ollama, Provider};
//! use weather_mcp::{mcp, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Ollama::create(
//!         "http://localhost:11434".to_string(),
//!         "llama3.2:3b-instruct-fp16".to_string(),
//!     );
//!     let server = mcp::connect_stdio(Path::new("target/debug/weather-server")).await?;
//!
//!     let mut session = Session::start(client, server).await?;
//!     let outcome = session.turn("Are there weather alerts in CA?").await?;
//!     println!("{}", outcome.answer);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod model;
pub mod options;
pub mod providers;
pub mod repl;
pub mod session;
pub mod tools;
pub mod transcript;
pub mod weather;

pub use client::{Client, ClientError};
pub use mcp::McpServer;
pub use model::{Message, Part, Response};
pub use session::{ChatError, Session, TurnOutcome};
pub use tools::{ToolDescriptor, ToolError, ToolInvocation};
pub use transcript::Transcript;
pub use weather::{NwsClient, WeatherServer};

// Re-export rmcp for convenience
pub use rmcp;
