//! Chat event stream decoding.
//!
//! The chat endpoint answers with newline-delimited frames:
//! - `data: <json>` - one event, `{"type":"content"|"error"|"done", ...}`
//! - anything else (blank lines, `:` comments) - ignored
//!
//! # Module structure
//! - `events` - Event and wire frame types (StreamEvent, ChatFrame)
//! - `decoder` - Byte-level incremental decoder (EventStreamDecoder)
//! - `stream` - Pull-based sequence over a transport body (EventStream)

mod decoder;
mod events;
mod stream;

pub use decoder::{EventStreamDecoder, FRAME_PREFIX};
pub use events::{ChatFrame, FrameType, StreamEvent, DEFAULT_STREAM_ERROR};
pub use stream::EventStream;
