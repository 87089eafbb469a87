//! HTTP client for the chat backend.
//!
//! Wraps an [`HttpClient`] transport with the endpoint table from
//! [`ApiConfig`] and the request/response payloads from [`crate::models`].

use crate::adapters::ReqwestHttpClient;
use crate::config::ApiConfig;
use crate::error::{ChatError, ChatResult};
use crate::models::{
    ChatRequest, ChatResponse, HealthResponse, HistoryLoadRequest, HistoryResponse,
    SuccessResponse, Tool, ToolsResponse,
};
use crate::sse::EventStream;
use crate::traits::{Headers, HttpClient, HttpError, Response};

/// Default number of messages requested by [`ChatClient::history`] callers
/// that have no preference.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Client for the chat backend API.
///
/// Generic over the transport so tests can inject a mock.
#[derive(Debug, Clone)]
pub struct ChatClient<C = ReqwestHttpClient> {
    config: ApiConfig,
    http: C,
}

impl ChatClient<ReqwestHttpClient> {
    /// Create a client backed by reqwest.
    pub fn new(config: ApiConfig) -> Self {
        let http = ReqwestHttpClient::new().with_request_timeout(config.request_timeout);
        Self { config, http }
    }

    /// Create a reqwest-backed client configured from the environment.
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }
}

impl<C: HttpClient> ChatClient<C> {
    /// Create a client over a custom transport.
    pub fn with_http(config: ApiConfig, http: C) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    fn json_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    /// Send a message and open the reply event stream.
    ///
    /// A non-2xx status fails with [`ChatError::Status`] before any event is
    /// produced.
    pub async fn stream_chat(&self, message: &str) -> ChatResult<EventStream> {
        let url = self.config.chat_stream_url();
        let body = serde_json::to_string(&ChatRequest::new(message))?;

        let mut headers = Self::json_headers();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        tracing::debug!(url = %url, message_length = message.len(), "Opening chat stream");

        match self.http.post_stream(&url, &body, &headers).await {
            Ok(body) => Ok(EventStream::new(body)),
            Err(HttpError::ServerError { status, message }) => {
                tracing::warn!(status, "Chat stream rejected: {}", message);
                Err(ChatError::status(status))
            }
            Err(e) => Err(ChatError::Transport(e)),
        }
    }

    /// Send a message and wait for the full reply.
    pub async fn complete(&self, message: &str) -> ChatResult<ChatResponse> {
        let body = serde_json::to_string(&ChatRequest::new(message).with_stream(false))?;
        let response = self
            .http
            .post(&self.config.chat_completion_url(), &body, &Self::json_headers())
            .await?;
        expect_json(response)
    }

    /// Clear the server-side conversation.
    pub async fn reset(&self) -> ChatResult<SuccessResponse> {
        let response = self
            .http
            .post(&self.config.chat_reset_url(), "", &Headers::new())
            .await?;
        expect_ack(response)
    }

    /// Fetch the most recent `limit` messages of the server conversation.
    pub async fn history(&self, limit: usize) -> ChatResult<HistoryResponse> {
        let url = format!("{}?limit={}", self.config.history_url(), limit);
        let response = self.http.get(&url, &Self::json_headers()).await?;
        expect_json(response)
    }

    /// Ask the server to persist the current conversation.
    pub async fn save_history(&self) -> ChatResult<SuccessResponse> {
        let response = self
            .http
            .post(&self.config.history_save_url(), "", &Self::json_headers())
            .await?;
        expect_ack(response)
    }

    /// Ask the server to replace its conversation with a saved file.
    pub async fn load_history(&self, filepath: &str) -> ChatResult<SuccessResponse> {
        let body = serde_json::to_string(&HistoryLoadRequest {
            filepath: filepath.to_string(),
        })?;
        let response = self
            .http
            .post(&self.config.history_load_url(), &body, &Self::json_headers())
            .await?;
        expect_ack(response)
    }

    /// Delete the server-side history.
    pub async fn clear_history(&self) -> ChatResult<SuccessResponse> {
        let response = self
            .http
            .delete(&self.config.history_url(), &Self::json_headers())
            .await?;
        expect_ack(response)
    }

    /// List the tools available to the agent.
    pub async fn tools(&self) -> ChatResult<Vec<Tool>> {
        let response = self
            .http
            .get(&self.config.tools_url(), &Self::json_headers())
            .await?;
        expect_json::<ToolsResponse>(response).map(|r| r.tools)
    }

    /// Look up one tool by name.
    pub async fn tool(&self, name: &str) -> ChatResult<Tool> {
        let response = self
            .http
            .get(&self.config.tool_url(name), &Self::json_headers())
            .await?;
        expect_json(response)
    }

    pub async fn health(&self) -> ChatResult<HealthResponse> {
        let response = self
            .http
            .get(&self.config.health_url(), &Self::json_headers())
            .await?;
        expect_json(response)
    }
}

fn expect_json<T: serde::de::DeserializeOwned>(response: Response) -> ChatResult<T> {
    if !response.is_success() {
        return Err(ChatError::api(response.status, &response.body));
    }
    Ok(response.json()?)
}

/// Like [`expect_json`], but an empty body counts as a plain success.
fn expect_ack(response: Response) -> ChatResult<SuccessResponse> {
    if !response.is_success() {
        return Err(ChatError::api(response.status, &response.body));
    }
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SuccessResponse {
            success: true,
            message: None,
            data: None,
        });
    }
    Ok(response.json()?)
}
