//! Data model shared by the client and the conversation session.

mod api;
mod message;

pub use api::{
    ChatRequest, ChatResponse, FunctionDefinition, HealthResponse, HistoryLoadRequest,
    HistoryResponse, SuccessResponse, Tool, ToolsResponse,
};
pub use message::{Message, MessageRole};
