use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use weather_mcp::client::{Client, ClientError};
use weather_mcp::model::{FinishReason, Message, Part};
use weather_mcp::options::{ModelOptions, TransportOptions};
use weather_mcp::providers::{Ollama, OllamaModel, Provider};
use weather_mcp::tools::ToolDescriptor;

fn alerts_tool() -> ToolDescriptor {
    ToolDescriptor::new(
        "get_alerts",
        "Get active weather alerts for a US state",
        json!({"type": "object", "properties": {"state": {"type": "string"}}}),
    )
}

#[test]
fn test_client_creation() {
    let client = Ollama::create(
        "http://localhost:11434/".to_string(),
        "llama3.2".to_string(),
    );
    assert_eq!(client.model_options().model, "llama3.2");
    assert_eq!(client.base_url(), "http://localhost:11434");
}

#[tokio::test]
async fn test_tool_call_response_is_parsed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({"model": "llama3.2", "stream": false})),
            Matcher::Regex(r#""tools":\[\{"type":"function","function":\{"name":"get_alerts""#.to_string()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": "",
                        "tool_calls": [{
                            "id": "call_abc",
                            "type": "function",
                            "function": {"name": "get_alerts", "arguments": "{\"state\":\"CA\"}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": {"prompt_tokens": 120, "completion_tokens": 18, "total_tokens": 138}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = Ollama::create(server.url(), "llama3.2".to_string());
    let response = client
        .request(vec![Message::user("Alerts in California?")], &[alerts_tool()])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.finish, FinishReason::ToolCalls);
    assert_eq!(response.usage.unwrap().prompt_tokens, Some(120));
    assert_eq!(
        response.data,
        vec![Message::Assistant(vec![Part::FunctionCall {
            id: Some("call_abc".into()),
            name: "get_alerts".into(),
            arguments: json!({"state": "CA"}),
        }])]
    );
}

#[tokio::test]
async fn test_tool_result_is_sent_with_tool_role() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                {"role": "system", "content": "You are a weather agent."},
                {"role": "user", "content": "Alerts in CA?"},
                {"role": "assistant", "tool_calls": [{"id": "call_abc", "type": "function",
                    "function": {"name": "get_alerts", "arguments": "{\"state\":\"CA\"}"}}]},
                {"role": "tool", "content": "Event: Heat Advisory",
                    "tool_call_id": "call_abc", "name": "get_alerts"}
            ],
            "keep_alive": "10m",
            "top_p": 0.5
        })))
        .with_status(200)
        .with_body(
            json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "There is a heat advisory."},
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut options = ModelOptions::<OllamaModel>::new("llama3.2")
        .with_system("You are a weather agent.")
        .with_top_p(0.5);
    options.provider.keep_alive = Some("10m".into());
    let client = Ollama::create_with_options(server.url(), options, TransportOptions::default());

    let messages = vec![
        Message::user("Alerts in CA?"),
        Message::Assistant(vec![Part::FunctionCall {
            id: Some("call_abc".into()),
            name: "get_alerts".into(),
            arguments: json!({"state": "CA"}),
        }]),
        Message::User(vec![Part::FunctionResponse {
            id: Some("call_abc".into()),
            name: "get_alerts".into(),
            content: "Event: Heat Advisory".into(),
            is_error: false,
        }]),
    ];
    let response = client.request(messages, &[]).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.finish, FinishReason::Stop);
    assert_eq!(
        response.data[0].content().as_deref(),
        Some("There is a heat advisory.")
    );
}

#[tokio::test]
async fn test_error_status_is_provider_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(404)
        .with_body(r#"{"error":{"message":"model \"nope\" not found, try pulling it first","type":"api_error"}}"#)
        .create_async()
        .await;

    let client = Ollama::create(server.url(), "nope".to_string());
    let err = client
        .request(vec![Message::user("hi")], &[])
        .await
        .unwrap_err();

    match err {
        ClientError::ProviderError(msg) => assert!(msg.contains("not found")),
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_checks_reachability() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/models")
        .with_status(200)
        .with_body(r#"{"object":"list","data":[{"id":"llama3.2","object":"model"}]}"#)
        .create_async()
        .await;

    let client = Ollama::create(server.url(), "llama3.2".to_string());
    assert!(client.probe().await.is_ok());

    let unreachable = Ollama::create_with_options(
        "http://127.0.0.1:9".to_string(),
        ModelOptions::new("llama3.2"),
        TransportOptions::new().with_timeout(Duration::from_secs(2)),
    );
    assert!(matches!(
        unreachable.probe().await,
        Err(ClientError::Http(_))
    ));
}
