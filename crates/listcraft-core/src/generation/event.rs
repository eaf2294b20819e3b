use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::state::SessionId;

/// Events the backend emits while a generation request is being served.
///
/// Wire shape is `{ "event": "<tag>", "data": { ... } }` with camelCase
/// payload fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum StreamEvent {
    #[serde(rename_all = "camelCase")]
    Started { estimated_tokens: u32 },
    Delta { text: String },
    #[serde(rename_all = "camelCase")]
    Finished {
        full_text: String,
        input_tokens: u32,
        output_tokens: u32,
        cost_cents: u32,
    },
    Error { message: String },
}

impl StreamEvent {
    /// Whether this event ends its session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. } | Self::Error { .. })
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Delta { .. } => "delta",
            Self::Finished { .. } => "finished",
            Self::Error { .. } => "error",
        }
    }
}

/// Backend-to-client event channel handed to a generation command.
///
/// Each sink belongs to exactly one session. Sending fails once the client
/// has stopped listening (the session was superseded or the app is shutting
/// down); backends may treat that as a signal to stop generating.
#[derive(Debug, Clone)]
pub struct EventSink {
    session_id: SessionId,
    tx: mpsc::UnboundedSender<StreamEvent>,
}

/// Error returned by [`EventSink::send`] when nobody is listening anymore.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("event sink for session {0} is closed")]
pub struct SinkClosed(pub SessionId);

impl EventSink {
    /// Creates a sink and the receiver the client drains.
    pub fn channel(session_id: SessionId) -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { session_id, tx }, rx)
    }

    /// Opaque handle identifying the session this sink feeds.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn send(&self, event: StreamEvent) -> Result<(), SinkClosed> {
        self.tx.send(event).map_err(|_| SinkClosed(self.session_id))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
