//! Unified error type for chat client operations.

use thiserror::Error;

use crate::traits::HttpError;

/// Type alias for Results using [`ChatError`].
pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    /// The request never produced a usable response (connect, timeout, body read).
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The stream endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// A JSON endpoint answered with a non-2xx status.
    #[error("{detail}")]
    Api { status: u16, detail: String },

    /// A response body did not match the expected shape.
    #[error("Invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    /// `send` or `begin_turn` was called while a turn is still streaming.
    #[error("A reply is still streaming; wait for it to finish before sending another message")]
    TurnInProgress,

    /// A turn was finished or failed while none was streaming.
    #[error("No reply is streaming")]
    NoActiveTurn,

    /// The message was empty or whitespace only.
    #[error("Message must not be empty")]
    EmptyMessage,
}

impl ChatError {
    /// Build the error for a non-2xx status on the stream endpoint.
    pub fn status(status: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string();
        ChatError::Status { status, reason }
    }

    /// Build the error for a non-2xx status on a JSON endpoint.
    ///
    /// Uses the `detail` field of the body when present, otherwise `HTTP <status>`.
    pub fn api(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("detail").and_then(|d| match d {
                    serde_json::Value::String(s) => Some(s.clone()),
                    serde_json::Value::Null => None,
                    other => Some(other.to_string()),
                })
            })
            .unwrap_or_else(|| format!("HTTP {}", status));
        ChatError::Api { status, detail }
    }

    /// HTTP status associated with this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ChatError::Status { status, .. } | ChatError::Api { status, .. } => Some(*status),
            ChatError::Transport(HttpError::ServerError { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Transport(e) => !matches!(e, HttpError::InvalidUrl(_)),
            ChatError::Status { status, .. } | ChatError::Api { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            ChatError::TurnInProgress => true,
            _ => false,
        }
    }

    /// Short error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Transport(_) => "E_CHAT_TRANSPORT",
            ChatError::Status { .. } => "E_CHAT_STATUS",
            ChatError::Api { .. } => "E_CHAT_API",
            ChatError::Json(_) => "E_CHAT_JSON",
            ChatError::TurnInProgress => "E_CHAT_BUSY",
            ChatError::NoActiveTurn => "E_CHAT_IDLE",
            ChatError::EmptyMessage => "E_CHAT_EMPTY",
        }
    }
}
