use mockito::{Matcher, Server};
use rmcp::service::{RoleClient, RunningService};
use rmcp::ServiceExt;
use serde_json::{json, Map, Value};
use std::time::Duration;
use weather_mcp::mcp::McpServer;
use weather_mcp::tools::ToolError;
use weather_mcp::weather::nws::default_transport;
use weather_mcp::{NwsClient, WeatherServer};

/// Serve the weather tools in-process against `api_base` and connect to them.
async fn connect(api_base: &str) -> RunningService<RoleClient, ()> {
    let nws = NwsClient::new(
        api_base,
        default_transport("weather-test/1.0", Duration::from_secs(5)),
    )
    .unwrap();
    let (client_transport, server_transport) = tokio::io::duplex(64 * 1024);

    tokio::spawn(async move {
        let service = WeatherServer::new(nws)
            .serve(server_transport)
            .await
            .expect("Failed to start server");
        service.waiting().await.expect("Server error");
    });

    ().serve(client_transport).await.unwrap()
}

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_lists_both_tools_with_schemas() {
    let service = connect("http://127.0.0.1:9").await;

    let tools = McpServer::list_tools(&service).await.unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"get_alerts"));
    assert!(names.contains(&"get_forecast"));

    let forecast = tools.iter().find(|t| t.name == "get_forecast").unwrap();
    let properties = forecast.input_schema.get("properties").unwrap();
    assert!(properties.get("latitude").is_some());
    assert!(properties.get("longitude").is_some());
    assert!(forecast.description.is_some());

    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_alerts_for_california() {
    let mut nws = Server::new_async().await;
    let mock = nws
        .mock("GET", "/alerts/active/area/CA")
        .match_header("user-agent", "weather-test/1.0")
        .match_header("accept", "application/geo+json")
        .with_status(200)
        .with_header("content-type", "application/geo+json")
        .with_body(
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "properties": {
                        "event": "Heat Advisory",
                        "areaDesc": "Coachella Valley, CA",
                        "severity": "Moderate",
                        "description": "Temperatures up to 112 expected.",
                        "instruction": "Drink plenty of fluids."
                    }
                }, {
                    "properties": {
                        "event": "Wind Advisory",
                        "areaDesc": "San Gorgonio Pass, CA",
                        "severity": "Minor"
                    }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = connect(&nws.url()).await;
    let text = McpServer::call_tool(&service, "get_alerts", args(json!({"state": "ca"})))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(text.contains("Event: Heat Advisory"));
    assert!(text.contains("Area: Coachella Valley, CA"));
    assert!(text.contains("\n---\n"));
    assert!(text.contains("Instructions: No specific instructions provided"));

    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_no_alerts_is_not_an_error() {
    let mut nws = Server::new_async().await;
    nws.mock("GET", "/alerts/active/area/VT")
        .with_status(200)
        .with_body(r#"{"type":"FeatureCollection","features":[]}"#)
        .create_async()
        .await;

    let service = connect(&nws.url()).await;
    let text = McpServer::call_tool(&service, "get_alerts", args(json!({"state": "VT"})))
        .await
        .unwrap();

    assert_eq!(text, "No active alerts for this state.");
    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_forecast_follows_points_link() {
    let mut nws = Server::new_async().await;
    let forecast_url = format!("{}/gridpoints/MTR/97,83/forecast", nws.url());

    let points = nws
        .mock("GET", "/points/37.3541,-122.0277")
        .with_status(200)
        .with_body(json!({"properties": {"forecast": forecast_url}}).to_string())
        .create_async()
        .await;

    let periods: Vec<Value> = (1..=7)
        .map(|i| {
            json!({
                "number": i,
                "name": format!("Period {i}"),
                "temperature": 60 + i,
                "temperatureUnit": "F",
                "windSpeed": "5 to 10 mph",
                "windDirection": "NW",
                "detailedForecast": format!("Sunny, high near {}.", 60 + i)
            })
        })
        .collect();
    let forecast = nws
        .mock("GET", "/gridpoints/MTR/97,83/forecast")
        .with_status(200)
        .with_body(json!({"properties": {"periods": periods}}).to_string())
        .create_async()
        .await;

    let service = connect(&nws.url()).await;
    let text = McpServer::call_tool(
        &service,
        "get_forecast",
        args(json!({"latitude": 37.3541, "longitude": -122.0277})),
    )
    .await
    .unwrap();

    points.assert_async().await;
    forecast.assert_async().await;
    assert!(text.starts_with("Period 1:\nTemperature: 61°F\nWind: 5 to 10 mph NW"));
    assert!(text.contains("Period 5:"));
    assert!(!text.contains("Period 6:"));
    assert_eq!(text.matches("\n---\n").count(), 4);

    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_invalid_arguments_are_rejected_before_upstream() {
    let mut nws = Server::new_async().await;
    let untouched = nws
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let service = connect(&nws.url()).await;

    let err = McpServer::call_tool(&service, "get_alerts", args(json!({"state": "California"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArgument(msg) if msg.contains("two-letter")));

    let err = McpServer::call_tool(
        &service,
        "get_forecast",
        args(json!({"latitude": 137.0, "longitude": 0.0})),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArgument(_)));

    let err = McpServer::call_tool(&service, "get_forecast", args(json!({"latitude": 37.0})))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArgument(_)));

    let err = McpServer::call_tool(&service, "get_tides", Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArgument(_)));

    untouched.assert_async().await;
    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_upstream_failures_are_tool_errors() {
    let mut nws = Server::new_async().await;
    nws.mock("GET", "/alerts/active/area/CA")
        .with_status(503)
        .with_body(r#"{"title":"Service Unavailable","detail":"Try again later"}"#)
        .create_async()
        .await;

    let service = connect(&nws.url()).await;
    let err = McpServer::call_tool(&service, "get_alerts", args(json!({"state": "CA"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::UpstreamUnavailable(msg) if msg.contains("Try again later")));

    // The connection survives the failure.
    let tools = McpServer::list_tools(&service).await.unwrap();
    assert_eq!(tools.len(), 2);
    service.cancel().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_upstream_is_reported() {
    // Nothing listens on the discard port.
    let service = connect("http://127.0.0.1:9").await;
    let err = McpServer::call_tool(&service, "get_alerts", args(json!({"state": "CA"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::UpstreamUnavailable(_)));
    service.cancel().await.unwrap();
}
