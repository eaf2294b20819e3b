//! Pure generation state.
//!
//! `GenerationState` holds one generation session plus the listing history
//! for a surface. Every method is a synchronous transition with no I/O; the
//! async store in the application layer wraps it behind a lock.
//!
//! # State machine
//!
//! ```text
//! Idle ──start──▶ Generating ──finish──▶ Finished
//!                     │
//!                     └────error───────▶ Errored
//! ```
//!
//! `start_generation` and `reset_generation` may be called from any state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::model::GenerationRecord;

/// Identifies one generate-request-to-terminal-event lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
    Finished,
    Errored,
}

impl GenerationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Errored)
    }
}

/// Token and cost accounting reported when a generation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_cents: u32,
}

/// The live (or most recent) generation on a surface.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSession {
    pub status: GenerationStatus,
    pub accumulated_text: String,
    pub error_message: Option<String>,
    /// Backend estimate from the `started` event, for progress display.
    pub estimated_tokens: Option<u32>,
    pub usage: Option<GenerationUsage>,
}

impl GenerationSession {
    pub fn is_generating(&self) -> bool {
        self.status == GenerationStatus::Generating
    }
}

/// Generation session plus listing history for one surface.
#[derive(Debug, Clone, Default)]
pub struct GenerationState {
    session: GenerationSession,
    current: Option<SessionId>,
    last_issued: u64,
    history: Vec<GenerationRecord>,
    is_loading_history: bool,
    history_load: u64,
}

impl GenerationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &GenerationSession {
        &self.session
    }

    /// The session id events must carry to be applied.
    pub fn current_session(&self) -> Option<SessionId> {
        self.current
    }

    pub fn is_current(&self, id: SessionId) -> bool {
        self.current == Some(id)
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    pub fn is_loading_history(&self) -> bool {
        self.is_loading_history
    }

    // ============================================================================
    // Session transitions
    // ============================================================================

    /// Enters `Generating` with an empty buffer and returns the new session id.
    ///
    /// Any previous text is discarded and any previous session id retired.
    pub fn start_generation(&mut self) -> SessionId {
        self.last_issued += 1;
        let id = SessionId(self.last_issued);
        self.current = Some(id);
        self.session = GenerationSession {
            status: GenerationStatus::Generating,
            ..GenerationSession::default()
        };
        id
    }

    /// Appends a chunk while generating. Returns `false` (and changes
    /// nothing) outside `Generating`.
    pub fn append_delta(&mut self, text: &str) -> bool {
        if !self.session.is_generating() {
            return false;
        }
        self.session.accumulated_text.push_str(text);
        true
    }

    /// Records the backend estimate from a `started` event.
    pub fn record_estimate(&mut self, estimated_tokens: u32) {
        if self.session.is_generating() {
            self.session.estimated_tokens = Some(estimated_tokens);
        }
    }

    /// Marks the session finished with the backend's authoritative text.
    ///
    /// `full_text` replaces whatever was accumulated from deltas.
    pub fn finish_generation(&mut self, full_text: String) {
        self.session.status = GenerationStatus::Finished;
        self.session.accumulated_text = full_text;
    }

    pub fn record_usage(&mut self, usage: GenerationUsage) {
        self.session.usage = Some(usage);
    }

    /// Marks the session errored. Partial text is kept visible.
    pub fn set_error(&mut self, message: String) {
        self.session.status = GenerationStatus::Errored;
        self.session.error_message = Some(message);
    }

    /// Back to `Idle` with nothing shown. Late events of the retired
    /// session no longer match [`Self::is_current`].
    pub fn reset_generation(&mut self) {
        self.current = None;
        self.session = GenerationSession::default();
    }

    // ============================================================================
    // History transitions
    // ============================================================================

    /// Starts a history load and returns its ticket. Starting another load
    /// makes every earlier ticket stale.
    pub fn begin_history_load(&mut self) -> u64 {
        self.history_load += 1;
        self.is_loading_history = true;
        self.history_load
    }

    /// Installs `records` if `ticket` belongs to the latest load. Returns
    /// whether it did; stale results are dropped.
    pub fn finish_history_load(&mut self, ticket: u64, records: Vec<GenerationRecord>) -> bool {
        if ticket != self.history_load {
            return false;
        }
        self.history = records;
        self.is_loading_history = false;
        true
    }

    pub fn replace_history(&mut self, records: Vec<GenerationRecord>) {
        self.history = records;
    }

    /// Flips `is_favorite` on the matching record. Returns whether one matched.
    pub fn flip_favorite(&mut self, id: &str) -> bool {
        match self.history.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.is_favorite = !record.is_favorite;
                true
            }
            None => false,
        }
    }

    /// Removes the matching record. Returns whether one was removed.
    pub fn remove_record(&mut self, id: &str) -> bool {
        let before = self.history.len();
        self.history.retain(|r| r.id != id);
        self.history.len() != before
    }
}
