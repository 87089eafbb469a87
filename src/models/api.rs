//! Request and response payloads of the chat backend REST API.

use serde::{Deserialize, Serialize};

use super::message::Message;

/// Body of `POST /chat` and `POST /chat/completion`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatRequest {
    /// Request for the streaming endpoint. `stream` is left unset, which the
    /// backend treats as `true`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stream: None,
        }
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }
}

/// Response of `POST /chat/completion`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    #[serde(default)]
    pub tool_calls: Option<Vec<serde_json::Value>>,
    /// Server-local ISO timestamp, kept verbatim
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Response of `GET /history`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
    pub total: usize,
}

/// Body of `POST /history/load`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryLoadRequest {
    pub filepath: String,
}

/// A function exposed by a tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON schema of the arguments
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// A tool registered with the agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub functions: Vec<FunctionDefinition>,
}

/// Response of `GET /tools`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolsResponse {
    pub tools: Vec<Tool>,
}

/// Generic acknowledgement returned by mutating endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuccessResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub tools_enabled: Vec<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    #[test]
    fn test_chat_request_omits_unset_stream() {
        let value = serde_json::to_value(ChatRequest::new("你好")).unwrap();
        assert_eq!(value, serde_json::json!({"message": "你好"}));

        let value = serde_json::to_value(ChatRequest::new("hi").with_stream(false)).unwrap();
        assert_eq!(value, serde_json::json!({"message": "hi", "stream": false}));
    }

    #[test]
    fn test_history_response() {
        let json = r#"{"messages":[{"role":"user","content":"hi","timestamp":null},{"role":"assistant","content":"hello"}],"total":2}"#;
        let history: HistoryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(history.total, 2);
        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.messages[1].role, MessageRole::Assistant);
    }

    #[test]
    fn test_tools_response() {
        let json = r#"{"tools":[{"name":"calculator","description":"math","functions":[
            {"name":"add","description":"a+b","parameters":{"type":"object"}}
        ]}]}"#;
        let tools: ToolsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(tools.tools[0].name, "calculator");
        assert_eq!(tools.tools[0].functions[0].parameters["type"], "object");
    }

    #[test]
    fn test_success_response_defaults() {
        let ok: SuccessResponse = serde_json::from_str(r#"{"message":"对话历史已重置"}"#).unwrap();
        assert!(ok.success);
        assert_eq!(ok.message.as_deref(), Some("对话历史已重置"));
        assert!(ok.data.is_none());
    }

    #[test]
    fn test_health_response() {
        let json = r#"{"status":"healthy","timestamp":"2026-02-05T10:00:00.123456","tools_enabled":["bash"]}"#;
        let health: HealthResponse = serde_json::from_str(json).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.tools_enabled, vec!["bash".to_string()]);
    }
}
