//! Interactive read-eval-print loop over a [`Session`].

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

use crate::client::Client;
use crate::mcp::McpServer;
use crate::session::{ChatError, Session};

/// The literal command that ends a session.
pub const QUIT: &str = "quit";

#[derive(Debug, thiserror::Error)]
pub enum ReplError {
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(QUIT)
}

/// Read queries from `input` until `quit` or end of input.
///
/// Model failures are printed and the loop continues; losing the tool
/// provider ends the loop with an error.
pub async fn run<C, S, R, W>(
    session: &mut Session<C, S>,
    input: R,
    mut output: W,
) -> Result<(), ReplError>
where
    C: Client,
    S: McpServer,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(b"\nMCP Client Started!\nType your queries or 'quit' to exit.\n")
        .await?;

    let mut lines = input.lines();
    loop {
        output.write_all(b"\nQuery: ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!("End of input");
            break;
        };
        if is_quit(&line) {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        match session.turn(query).await {
            Ok(outcome) => {
                let mut text = String::from("\n");
                if let Some(call) = &outcome.tool_call {
                    text.push_str(&format!(
                        "[Calling tool {} with args {}]\n",
                        call.name,
                        call.display_arguments()
                    ));
                }
                if outcome.answer.trim().is_empty() {
                    text.push_str("(no response)");
                } else {
                    text.push_str(&outcome.answer);
                }
                text.push('\n');
                output.write_all(text.as_bytes()).await?;
            }
            Err(e) if e.is_fatal() => {
                error!("Session ended: {}", e);
                output.flush().await?;
                return Err(e.into());
            }
            Err(e) => {
                output
                    .write_all(format!("\nError: {e}\n").as_bytes())
                    .await?;
            }
        }
    }

    output.flush().await?;
    Ok(())
}
