//! Stream event and wire frame types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when an error frame carries no (or an empty) `error` field.
pub const DEFAULT_STREAM_ERROR: &str = "Stream error";

/// Typed event decoded from one `data:` frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Text delta of the assistant reply
    Content { text: String },
    /// The backend aborted the turn; no further events follow
    Error { message: String },
    /// The backend finished the turn; no further events follow
    Done,
}

impl StreamEvent {
    pub fn content(text: impl Into<String>) -> Self {
        StreamEvent::Content { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        StreamEvent::Error {
            message: message.into(),
        }
    }

    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Error { .. } | StreamEvent::Done)
    }
}

/// Recognized values of the frame `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Content,
    Error,
    Done,
}

impl FrameType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "content" => Some(FrameType::Content),
            "error" => Some(FrameType::Error),
            "done" => Some(FrameType::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameType::Content => "content",
            FrameType::Error => "error",
            FrameType::Done => "done",
        }
    }
}

/// JSON payload of a `data:` line: `{"type": ..., "content"?: ..., "error"?: ...}`
///
/// `content` and `error` are kept as raw JSON so an unexpected value type
/// never hides the frame's `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatFrame {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ChatFrame {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            kind: FrameType::Content.as_str().to_string(),
            content: Some(Value::String(text.into())),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FrameType::Error.as_str().to_string(),
            content: None,
            error: Some(Value::String(message.into())),
        }
    }

    pub fn done() -> Self {
        Self {
            kind: FrameType::Done.as_str().to_string(),
            content: None,
            error: None,
        }
    }

    pub fn frame_type(&self) -> Option<FrameType> {
        FrameType::parse(&self.kind)
    }

    /// Text delta carried by the frame. Non-string and empty values carry none.
    pub fn content_text(&self) -> Option<&str> {
        match &self.content {
            Some(Value::String(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Error message of the frame, falling back to [`DEFAULT_STREAM_ERROR`].
    ///
    /// A non-string `error` is reported as its JSON text.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(Value::String(message)) if !message.is_empty() => message.clone(),
            Some(Value::String(_)) | Some(Value::Null) | None => DEFAULT_STREAM_ERROR.to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// Render the frame the way the backend writes it: `data: <json>\n\n`.
    pub fn encode(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        format!("{}{}\n\n", super::decoder::FRAME_PREFIX, json)
    }
}
