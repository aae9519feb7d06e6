use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use tokio::io::BufReader;
use tracing::{debug, warn};
use weather_mcp::client::Client;
use weather_mcp::config::{self, ClientSettings};
use weather_mcp::providers::{Ollama, Provider};
use weather_mcp::{logging, mcp, repl, Session};

const USAGE: &str = "Usage: weather-client <path_to_server>";

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = config::load_dotenv();
    logging::init("warn");
    match dotenv {
        Ok(Some(path)) => debug!("Loaded settings from {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("\nError: {e}");
            return ExitCode::FAILURE;
        }
    }

    let mut args = std::env::args_os().skip(1);
    let (Some(path), None) = (args.next(), args.next()) else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    match run(Path::new(&path)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(provider: &Path) -> Result<(), Box<dyn Error>> {
    let settings = ClientSettings::from_env()?;

    let server = mcp::connect_stdio(provider).await?;

    let base_url = settings.base_url.clone();
    let client = Ollama::create_with_options(
        settings.base_url,
        settings.model_options,
        settings.transport_options,
    );
    client
        .probe()
        .await
        .map_err(|e| format!("model runtime at {base_url} is unreachable: {e}"))?;

    let mut session = Session::start(client, server).await?;
    let names: Vec<&str> = session.tools().iter().map(|t| t.name.as_str()).collect();
    println!("\nConnected to server with tools: {names:?}");

    let input = BufReader::new(tokio::io::stdin());
    let result = repl::run(&mut session, input, tokio::io::stdout()).await;

    if let Err(e) = session.into_server().cancel().await {
        warn!("Tool provider did not shut down cleanly: {}", e);
    }

    result?;
    Ok(())
}
