//! Pull-based event sequence over a streaming HTTP body.

use std::collections::VecDeque;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;

use super::decoder::EventStreamDecoder;
use super::events::StreamEvent;
use crate::error::{ChatError, ChatResult};
use crate::traits::ByteStream;

/// Lazy sequence of [`StreamEvent`]s read from a transport byte stream.
///
/// Each call to [`next_event`](Self::next_event) reads at most one chunk from
/// the transport. The body is released as soon as the sequence ends (normal
/// end of stream, a terminal frame, or a read error) and, for early
/// abandonment, when the `EventStream` is dropped.
pub struct EventStream {
    body: Option<ByteStream>,
    decoder: EventStreamDecoder,
    ready: VecDeque<StreamEvent>,
}

impl EventStream {
    pub fn new(body: ByteStream) -> Self {
        Self {
            body: Some(body),
            decoder: EventStreamDecoder::new(),
            ready: VecDeque::new(),
        }
    }

    /// Next decoded event, `None` once the sequence is exhausted.
    ///
    /// A transport read failure is returned once as `Some(Err(_))`; the
    /// sequence ends after it.
    pub async fn next_event(&mut self) -> Option<ChatResult<StreamEvent>> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Some(Ok(event));
            }

            let body = self.body.as_mut()?;
            match body.next().await {
                Some(Ok(chunk)) => {
                    let events = self.decoder.feed(&chunk);
                    self.ready.extend(events);
                    if self.decoder.is_terminated() {
                        self.release("terminal frame");
                    }
                }
                Some(Err(e)) => {
                    self.release("read error");
                    return Some(Err(ChatError::Transport(e)));
                }
                None => {
                    let events = self.decoder.finish();
                    self.ready.extend(events);
                    self.release("end of stream");
                }
            }
        }
    }

    /// Collect the remaining events, stopping at the first transport error.
    pub async fn collect_events(mut self) -> ChatResult<Vec<StreamEvent>> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event?);
        }
        Ok(events)
    }

    /// Adapt into a `futures::Stream`.
    pub fn into_stream(self) -> impl Stream<Item = ChatResult<StreamEvent>> + Send {
        stream::unfold(self, |mut events| async move {
            events.next_event().await.map(|item| (item, events))
        })
    }

    /// Abandon the sequence and release the transport now.
    pub fn close(&mut self) {
        self.ready.clear();
        self.release("closed by caller");
    }

    /// Whether the transport has been released.
    pub fn is_released(&self) -> bool {
        self.body.is_none()
    }

    /// Frames skipped so far because they could not be decoded.
    pub fn skipped_frames(&self) -> u64 {
        self.decoder.skipped_frames()
    }

    fn release(&mut self, reason: &str) {
        if self.body.take().is_some() {
            tracing::debug!(
                skipped_frames = self.decoder.skipped_frames(),
                "Released event stream body ({})",
                reason
            );
        }
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("released", &self.is_released())
            .field("decoder", &self.decoder)
            .field("ready", &self.ready)
            .finish()
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.release("dropped before completion");
    }
}
