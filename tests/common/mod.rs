//! Shared fixtures for integration tests against a wiremock backend.

#![allow(dead_code)]

use kortix_chat::config::ApiConfig;
use kortix_chat::sse::ChatFrame;
use kortix_chat::{ChatClient, ConversationSession};
use wiremock::MockServer;

/// Client pointed at the mock server with a short request timeout.
pub fn client_for(server: &MockServer) -> ChatClient {
    let config = ApiConfig::default()
        .with_base_url(server.uri())
        .with_request_timeout(std::time::Duration::from_secs(5));
    ChatClient::new(config)
}

pub fn session_for(server: &MockServer) -> ConversationSession {
    ConversationSession::new(client_for(server))
}

/// Event stream body the way the backend writes it.
pub fn sse_body(frames: &[ChatFrame]) -> String {
    frames.iter().map(ChatFrame::encode).collect()
}
