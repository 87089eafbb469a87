//! REST endpoint tests using wiremock.
//!
//! These tests verify that ChatClient calls each backend endpoint with the
//! right method, path and body, and maps error statuses.

mod common;

use common::client_for;
use kortix_chat::ChatError;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_reset_posts_to_reset_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/reset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "对话已重置"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ack = client_for(&mock_server).reset().await.unwrap();
    assert!(ack.success);
    assert_eq!(ack.message.as_deref(), Some("对话已重置"));
}

#[tokio::test]
async fn test_reset_failure_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/reset"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "detail": "重置对话失败"
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).reset().await.unwrap_err();
    assert_eq!(err.http_status(), Some(500));
    assert_eq!(err.to_string(), "重置对话失败");
}

#[tokio::test]
async fn test_history_with_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/history"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [
                {"role": "user", "content": "你好", "timestamp": "2026-02-05T10:00:00.000001"},
                {"role": "assistant", "content": "你好！", "timestamp": "2026-02-05T10:00:01.5"},
                {"role": "tool", "content": "{}", "tool_call_id": "call_1", "name": "bash"}
            ],
            "total": 12
        })))
        .mount(&mock_server)
        .await;

    let history = client_for(&mock_server).history(3).await.unwrap();
    assert_eq!(history.total, 12);
    assert_eq!(history.messages.len(), 3);
    assert!(history.messages[0].timestamp.is_some());
    assert_eq!(history.messages[2].tool_call_id.as_deref(), Some("call_1"));
}

#[tokio::test]
async fn test_history_save_load_clear() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/history/save"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {"filepath": "./conversations/conversation_1.json"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/history/load"))
        .and(body_json(serde_json::json!({"filepath": "./conversations/conversation_1.json"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let saved = client.save_history().await.unwrap();
    assert!(saved.data.is_some());
    client
        .load_history("./conversations/conversation_1.json")
        .await
        .unwrap();
    client.clear_history().await.unwrap();
}

#[tokio::test]
async fn test_tools_listing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tools": [
                {"name": "bash", "description": "Run shell commands", "functions": [
                    {"name": "run", "description": "Run a command", "parameters": {"type": "object"}}
                ]},
                {"name": "files", "description": "File operations", "functions": []}
            ]
        })))
        .mount(&mock_server)
        .await;

    let tools = client_for(&mock_server).tools().await.unwrap();
    let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["bash", "files"]);
    assert_eq!(tools[0].functions[0].name, "run");
}

#[tokio::test]
async fn test_tool_name_is_path_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tools/web%20search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "web search",
            "description": "Search the web"
        })))
        .mount(&mock_server)
        .await;

    let tool = client_for(&mock_server).tool("web search").await.unwrap();
    assert_eq!(tool.name, "web search");
    assert!(tool.functions.is_empty());
}

#[tokio::test]
async fn test_completion_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completion"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({"message": "hi", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": "hello",
            "tool_calls": null,
            "timestamp": "2026-02-05T10:00:00"
        })))
        .mount(&mock_server)
        .await;

    let reply = client_for(&mock_server).complete("hi").await.unwrap();
    assert_eq!(reply.content, "hello");
}

#[tokio::test]
async fn test_health_endpoint_is_unversioned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "timestamp": "2026-02-05T10:00:00",
            "tools_enabled": ["bash"]
        })))
        .mount(&mock_server)
        .await;

    let health = client_for(&mock_server).health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.tools_enabled, vec!["bash".to_string()]);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = kortix_chat::ChatClient::new(
        kortix_chat::ApiConfig::default().with_base_url("http://127.0.0.1:1"),
    );

    let err = client.tools().await.unwrap_err();
    assert!(matches!(err, ChatError::Transport(_)), "got {:?}", err);
    assert!(err.is_retryable());
}
