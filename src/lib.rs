//! Streaming chat client for an agent backend.
//!
//! The core is two pieces:
//! - [`sse::EventStreamDecoder`] turns the chat endpoint's byte stream into
//!   typed [`sse::StreamEvent`]s, robust to arbitrary chunk boundaries.
//! - [`session::ConversationSession`] consumes those events to grow a pending
//!   assistant reply and finalize it into the conversation history.
//!
//! [`client::ChatClient`] covers the rest of the REST API (reset, history,
//! tools, health) over a pluggable [`traits::HttpClient`] transport.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;

pub use client::ChatClient;
pub use config::{ApiConfig, Locale};
pub use error::{ChatError, ChatResult};
pub use session::{ConversationSession, SessionUpdate, TurnState};
pub use sse::{EventStream, EventStreamDecoder, StreamEvent};
