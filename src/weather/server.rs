//! MCP server exposing the weather tools.

use rmcp::handler::server::{router::tool::ToolRouter, wrapper::Parameters};
use rmcp::model::{
    CallToolResult, Content, ErrorData as McpError, Implementation, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use tracing::{info, warn};

use super::{AlertsArgs, ForecastArgs, NwsClient, WeatherError, WeatherQuery};

#[derive(Debug, Clone)]
pub struct WeatherServer {
    nws: NwsClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WeatherServer {
    pub fn new(nws: NwsClient) -> Self {
        Self {
            nws,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get active weather alerts for a US state")]
    async fn get_alerts(
        &self,
        Parameters(args): Parameters<AlertsArgs>,
    ) -> Result<CallToolResult, McpError> {
        self.run(WeatherQuery::Alerts(args)).await
    }

    #[tool(description = "Get the weather forecast for a location in the US")]
    async fn get_forecast(
        &self,
        Parameters(args): Parameters<ForecastArgs>,
    ) -> Result<CallToolResult, McpError> {
        self.run(WeatherQuery::Forecast(args)).await
    }
}

impl WeatherServer {
    /// Invalid arguments are a protocol error; upstream failures are reported
    /// as a tool result flagged as an error so the conversation can go on.
    async fn run(&self, query: WeatherQuery) -> Result<CallToolResult, McpError> {
        let tool = query.tool_name();
        let query = query.validate().map_err(|e| {
            warn!("Rejected {} call: {}", tool, e);
            McpError::invalid_params(e.to_string(), None)
        })?;

        info!("Tool call: {:?}", query);
        match self.nws.fetch(&query).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e @ WeatherError::InvalidArgument(_)) => {
                Err(McpError::invalid_params(e.to_string(), None))
            }
            Err(e) => {
                warn!("Tool {} failed: {}", tool, e);
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "weather".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Weather alerts by US state code and forecasts by latitude/longitude, \
                 served from the National Weather Service."
                    .into(),
            ),
            ..Default::default()
        }
    }
}
