//! Turn state and observer notifications for a conversation session.

use crate::models::Message;

/// Whether an assistant reply is currently being streamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    Streaming,
}

/// Outcome of applying one stream event to the active turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnProgress {
    /// Pending reply grew; more events may follow
    Continue,
    /// The reply was finalized into history
    Completed,
    /// The turn failed and an error message was appended to history
    Failed,
    /// No turn was streaming, the event was dropped
    Ignored,
}

impl TurnProgress {
    pub fn is_finished(&self) -> bool {
        matches!(self, TurnProgress::Completed | TurnProgress::Failed)
    }
}

/// Change notification sent to session observers after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// A turn started with this user message
    UserMessageAdded(Message),
    /// The in-flight reply grew by `delta`
    PendingAppended { delta: String },
    /// The reply was finalized and appended to history
    TurnCompleted(Message),
    /// The turn failed; `message` is the localized text appended to history
    TurnFailed { error: String, message: Message },
    /// History and pending buffer were cleared
    Reset,
    /// History was replaced from the server
    HistoryReplaced { len: usize },
}
