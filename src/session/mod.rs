//! Conversation session: history plus one streaming assistant turn at a time.
//!
//! A turn moves `Idle -> Streaming -> Idle`. While streaming, content deltas
//! grow a pending buffer that is not part of history; the turn ends either by
//! finalizing the buffer into an assistant message or, on any failure, by
//! appending a localized error message instead.

mod state;

pub use state::{SessionUpdate, TurnProgress, TurnState};

use tokio::sync::mpsc;

use crate::adapters::ReqwestHttpClient;
use crate::client::ChatClient;
use crate::config::Locale;
use crate::error::{ChatError, ChatResult};
use crate::models::Message;
use crate::sse::StreamEvent;
use crate::traits::HttpClient;

/// Owns the ordered message history and drives assistant turns.
pub struct ConversationSession<C = ReqwestHttpClient> {
    client: ChatClient<C>,
    locale: Locale,
    history: Vec<Message>,
    /// Text of the in-flight reply
    pending: String,
    state: TurnState,
    observers: Vec<mpsc::UnboundedSender<SessionUpdate>>,
}

impl<C: HttpClient> ConversationSession<C> {
    /// Create an empty session. Failure text uses the client's configured locale.
    pub fn new(client: ChatClient<C>) -> Self {
        let locale = client.config().locale;
        Self {
            client,
            locale,
            history: Vec::new(),
            pending: String::new(),
            state: TurnState::Idle,
            observers: Vec::new(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn client(&self) -> &ChatClient<C> {
        &self.client
    }

    /// Register an observer. Every later mutation is delivered in order.
    ///
    /// Dropped receivers are pruned on the next update.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionUpdate> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    /// Send a message and stream the reply to completion.
    ///
    /// Returns the assistant message appended to history. Transport and
    /// stream failures do not surface as `Err`: they end the turn with a
    /// localized error message, which is what gets returned.
    pub async fn send(&mut self, text: &str) -> ChatResult<&Message> {
        self.begin_turn(text)?;

        let mut events = match self.client.stream_chat(text).await {
            Ok(events) => events,
            Err(e) => {
                tracing::error!(code = e.error_code(), "Chat request failed: {}", e);
                return self.fail_turn(&e.to_string());
            }
        };

        while let Some(item) = events.next_event().await {
            match item {
                Ok(event) => {
                    if self.apply_event(event).is_finished() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(code = e.error_code(), "Chat stream read failed: {}", e);
                    return self.fail_turn(&e.to_string());
                }
            }
        }

        if events.skipped_frames() > 0 {
            tracing::warn!(
                skipped = events.skipped_frames(),
                "Turn finished with unreadable frames"
            );
        }

        match self.state {
            TurnState::Streaming => self.finish_turn(),
            TurnState::Idle => self.last_message().ok_or(ChatError::NoActiveTurn),
        }
    }

    /// Start a turn: append the user message and enter `Streaming`.
    pub fn begin_turn(&mut self, text: &str) -> ChatResult<&Message> {
        if self.state == TurnState::Streaming {
            tracing::warn!("Blocked send while a reply is still streaming");
            return Err(ChatError::TurnInProgress);
        }
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let message = Message::user(text);
        self.pending.clear();
        self.state = TurnState::Streaming;
        tracing::debug!(message_length = text.len(), "Turn started");
        self.publish(SessionUpdate::UserMessageAdded(message.clone()));
        Ok(self.append(message))
    }

    /// Apply one decoded event to the active turn.
    pub fn apply_event(&mut self, event: StreamEvent) -> TurnProgress {
        if self.state != TurnState::Streaming {
            tracing::debug!(?event, "Dropped stream event with no active turn");
            return TurnProgress::Ignored;
        }

        match event {
            StreamEvent::Content { text } => {
                self.pending.push_str(&text);
                self.publish(SessionUpdate::PendingAppended { delta: text });
                TurnProgress::Continue
            }
            StreamEvent::Error { message } => {
                tracing::error!("Backend reported stream error: {}", message);
                self.close_failed(&message);
                TurnProgress::Failed
            }
            StreamEvent::Done => {
                self.close_completed();
                TurnProgress::Completed
            }
        }
    }

    /// Finalize the pending buffer into an assistant message.
    pub fn finish_turn(&mut self) -> ChatResult<&Message> {
        if self.state != TurnState::Streaming {
            return Err(ChatError::NoActiveTurn);
        }
        Ok(self.close_completed())
    }

    /// End the active turn with a localized error message.
    pub fn fail_turn(&mut self, error: &str) -> ChatResult<&Message> {
        if self.state != TurnState::Streaming {
            return Err(ChatError::NoActiveTurn);
        }
        Ok(self.close_failed(error))
    }

    /// Reset the server conversation, then clear local state.
    ///
    /// If the server call fails, history and pending text are left as they were.
    pub async fn reset(&mut self) -> ChatResult<()> {
        if let Err(e) = self.client.reset().await {
            tracing::error!(code = e.error_code(), "Conversation reset failed: {}", e);
            return Err(e);
        }

        self.history.clear();
        self.pending.clear();
        self.state = TurnState::Idle;
        tracing::info!("Conversation reset");
        self.publish(SessionUpdate::Reset);
        Ok(())
    }

    /// Replace local history with the last `limit` messages stored on the server.
    pub async fn sync_history(&mut self, limit: usize) -> ChatResult<usize> {
        if self.state == TurnState::Streaming {
            return Err(ChatError::TurnInProgress);
        }

        let response = self.client.history(limit).await?;
        self.history = response.messages;
        let len = self.history.len();
        tracing::debug!(len, total = response.total, "History synced from server");
        self.publish(SessionUpdate::HistoryReplaced { len });
        Ok(len)
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Text of the reply currently streaming; empty when idle.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_streaming(&self) -> bool {
        self.state == TurnState::Streaming
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.history.last()
    }

    fn close_completed(&mut self) -> &Message {
        let message = Message::assistant(std::mem::take(&mut self.pending));
        self.state = TurnState::Idle;
        tracing::debug!(reply_length = message.content.len(), "Turn completed");
        self.publish(SessionUpdate::TurnCompleted(message.clone()));
        self.append(message)
    }

    fn close_failed(&mut self, error: &str) -> &Message {
        let message = Message::assistant(self.locale.turn_failed(error));
        self.pending.clear();
        self.state = TurnState::Idle;
        self.publish(SessionUpdate::TurnFailed {
            error: error.to_string(),
            message: message.clone(),
        });
        self.append(message)
    }

    fn append(&mut self, message: Message) -> &Message {
        self.history.push(message);
        &self.history[self.history.len() - 1]
    }

    fn publish(&mut self, update: SessionUpdate) {
        self.observers.retain(|tx| tx.send(update.clone()).is_ok());
    }
}

impl<C> std::fmt::Debug for ConversationSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSession")
            .field("locale", &self.locale)
            .field("history_len", &self.history.len())
            .field("pending_len", &self.pending.len())
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}
