//! Error handling for the chat client.
//!
//! Every fallible library operation returns [`ChatResult`]. Transport-level
//! problems come from the [`HttpClient`](crate::traits::HttpClient) seam as
//! [`HttpError`] and are wrapped here; turn-level failures never leave the
//! session as errors (they become assistant messages instead).

mod chat_error;

pub use chat_error::{ChatError, ChatResult};
