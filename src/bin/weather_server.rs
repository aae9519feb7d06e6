use std::error::Error;
use std::process::ExitCode;

use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing::{debug, error, info};
use weather_mcp::config::{self, ServerSettings};
use weather_mcp::{logging, NwsClient, WeatherServer};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = config::load_dotenv();
    logging::init("warn");
    match dotenv {
        Ok(Some(path)) => debug!("Loaded settings from {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            error!("Weather server failed: {}", e);
            return ExitCode::FAILURE;
        }
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Weather server failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let settings = ServerSettings::from_env()?;
    let nws = NwsClient::new(settings.api_base.clone(), settings.transport_options())?;
    info!("Serving weather tools backed by {}", nws.base_url());

    let service = WeatherServer::new(nws).serve(stdio()).await?;
    let reason = service.waiting().await?;
    info!("Weather server stopped: {:?}", reason);
    Ok(())
}
