//! Streaming session controller.
//!
//! Turns one generation request into a session: a fresh session id on the
//! store, an event channel drained by a spawned task, and the backend call.
//! The drain task is running before the backend sees the request, so even
//! events emitted synchronously during the call are delivered.

use std::sync::Arc;

use listcraft_core::commands::GenerationCommands;
use listcraft_core::generation::{EventSink, GenerationRequest, SessionId, StreamEvent};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::session::{EventDisposition, StreamSession};
use super::store::GenerationStore;

/// A started generation.
pub struct GenerationHandle {
    session_id: SessionId,
    drain: JoinHandle<()>,
}

impl GenerationHandle {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Waits until the session's events stopped flowing: a terminal event
    /// arrived, the stream closed, or the session was superseded.
    pub async fn wait(self) {
        if let Err(e) = self.drain.await {
            tracing::error!(
                "[SessionController] Drain task for {} panicked: {}",
                self.session_id,
                e
            );
        }
    }
}

/// Drives generation sessions for one surface.
///
/// There is no mutual exclusion: starting a new session while one is live
/// supersedes it, and the store ignores whatever the old one still emits.
pub struct StreamingSessionController {
    store: Arc<GenerationStore>,
    commands: Arc<dyn GenerationCommands>,
    shutdown: CancellationToken,
    active: Mutex<Option<CancellationToken>>,
}

impl StreamingSessionController {
    pub fn new(
        store: Arc<GenerationStore>,
        commands: Arc<dyn GenerationCommands>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            commands,
            shutdown: shutdown.child_token(),
            active: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<GenerationStore> {
        &self.store
    }

    /// Starts a session for `request`.
    ///
    /// Returns once the backend accepted (or refused) the request. A refused
    /// request leaves the session errored with the refusal message.
    pub async fn generate(&self, request: GenerationRequest) -> GenerationHandle {
        let session_id = self.store.start_generation().await;
        let (sink, events) = EventSink::channel(session_id);

        let token = self.shutdown.child_token();
        if let Some(previous) = self.active.lock().await.replace(token.clone()) {
            previous.cancel();
        }

        let session = StreamSession::new(session_id, &request, self.store.clone());
        let drain = tokio::spawn(drain_events(session, events, token));

        tracing::info!(
            "[SessionController] Starting {} generation {} for property {}",
            request.kind(),
            session_id,
            request.property_id()
        );

        if let Err(e) = self.commands.generate(request, sink).await {
            tracing::warn!(
                "[SessionController] Generation {} was not accepted: {}",
                session_id,
                e
            );
            self.store.fail_session(session_id, e.to_string()).await;
        }

        GenerationHandle { session_id, drain }
    }

    /// Stops draining every session started by this controller.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

async fn drain_events(
    mut session: StreamSession,
    mut events: mpsc::UnboundedReceiver<StreamEvent>,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("[SessionController] Drain cancelled");
                break;
            }
            event = events.recv() => match event {
                Some(event) => match session.handle(event).await {
                    EventDisposition::Applied if session.is_closed() => break,
                    EventDisposition::Stale => break,
                    _ => {}
                },
                None => {
                    session.close_unfinished().await;
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockBackend, record};
    use listcraft_core::generation::{
        GenerationStatus, GenerationType, ListingLength, ListingParams, ListingStyle, ListingTone,
    };
    use std::time::Duration;

    fn listing_request() -> GenerationRequest {
        GenerationRequest::Listing(ListingParams {
            property_id: "prop-1".to_string(),
            style: ListingStyle::Luxury,
            tone: ListingTone::Warm,
            length: ListingLength::Medium,
            seo_keywords: vec!["ocean view".to_string()],
            brand_voice_id: None,
        })
    }

    fn delta(text: &str) -> StreamEvent {
        StreamEvent::Delta {
            text: text.to_string(),
        }
    }

    fn controller(backend: &Arc<MockBackend>) -> StreamingSessionController {
        let store = Arc::new(GenerationStore::new(backend.clone()));
        StreamingSessionController::new(store, backend.clone(), CancellationToken::new())
    }

    #[tokio::test]
    async fn test_streamed_listing_finishes_with_full_text() {
        let backend = Arc::new(MockBackend::new());
        backend
            .script(vec![
                StreamEvent::Started {
                    estimated_tokens: 300,
                },
                delta("Beautiful "),
                delta("home."),
                StreamEvent::Finished {
                    full_text: "Beautiful home.".to_string(),
                    input_tokens: 120,
                    output_tokens: 4,
                    cost_cents: 1,
                },
            ])
            .await;
        let controller = controller(&backend);

        controller.generate(listing_request()).await.wait().await;

        let session = controller.store().session().await;
        assert!(!session.is_generating());
        assert_eq!(session.status, GenerationStatus::Finished);
        assert_eq!(session.accumulated_text, "Beautiful home.");
        assert_eq!(session.error_message, None);
        assert_eq!(session.estimated_tokens, Some(300));
        assert_eq!(session.usage.map(|u| u.output_tokens), Some(4));
    }

    #[tokio::test]
    async fn test_error_event_keeps_partial_text() {
        let backend = Arc::new(MockBackend::new());
        backend
            .script(vec![
                delta("Beautiful "),
                StreamEvent::Error {
                    message: "rate limited".to_string(),
                },
            ])
            .await;
        let controller = controller(&backend);

        controller.generate(listing_request()).await.wait().await;

        let session = controller.store().session().await;
        assert!(!session.is_generating());
        assert_eq!(session.accumulated_text, "Beautiful ");
        assert_eq!(session.error_message.as_deref(), Some("rate limited"));
    }

    #[tokio::test]
    async fn test_refused_request_sets_error() {
        let backend = Arc::new(MockBackend::new());
        backend.fail("generate_listing", "invalid API key").await;
        let controller = controller(&backend);

        controller.generate(listing_request()).await.wait().await;

        let session = controller.store().session().await;
        assert_eq!(session.status, GenerationStatus::Errored);
        assert_eq!(session.error_message.as_deref(), Some("invalid API key"));
    }

    #[tokio::test]
    async fn test_new_session_ignores_previous_stream() {
        let backend = Arc::new(MockBackend::new());
        backend.hold_sinks().await;
        let controller = controller(&backend);

        let first = controller.generate(listing_request()).await;
        let first_sink = backend.take_sink().await.unwrap();
        let second = controller.generate(listing_request()).await;
        let second_sink = backend.take_sink().await.unwrap();

        // The first drain is cancelled; its sink has no listener anymore.
        first.wait().await;
        let _ = first_sink.send(delta("old "));
        second_sink.send(delta("new")).unwrap();
        second_sink
            .send(StreamEvent::Finished {
                full_text: "new".to_string(),
                input_tokens: 1,
                output_tokens: 1,
                cost_cents: 0,
            })
            .unwrap();
        second.wait().await;

        let session = controller.store().session().await;
        assert_eq!(session.accumulated_text, "new");
        assert_eq!(session.status, GenerationStatus::Finished);
    }

    #[tokio::test]
    async fn test_reset_drops_late_events() {
        let backend = Arc::new(MockBackend::new());
        backend.hold_sinks().await;
        let controller = controller(&backend);

        let handle = controller.generate(listing_request()).await;
        let sink = backend.take_sink().await.unwrap();
        controller.store().reset_generation().await;
        sink.send(delta("late")).unwrap();
        handle.wait().await;

        let session = controller.store().session().await;
        assert_eq!(session.status, GenerationStatus::Idle);
        assert_eq!(session.accumulated_text, "");
    }

    #[tokio::test]
    async fn test_listing_finish_triggers_history_reload() {
        let backend = Arc::new(MockBackend::new());
        backend
            .set_listings(vec![
                record("l-1", GenerationType::Listing, false),
                record("s-1", GenerationType::SocialInstagram, false),
            ])
            .await;
        backend
            .script(vec![StreamEvent::Finished {
                full_text: "Done.".to_string(),
                input_tokens: 1,
                output_tokens: 1,
                cost_cents: 0,
            }])
            .await;
        let controller = controller(&backend);
        let mut revisions = controller.store().subscribe();

        controller.generate(listing_request()).await.wait().await;

        tokio::time::timeout(Duration::from_secs(1), async {
            while controller.store().history().await.is_empty() {
                revisions.changed().await.unwrap();
            }
        })
        .await
        .unwrap();
        assert_eq!(controller.store().history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_stops_drain() {
        let backend = Arc::new(MockBackend::new());
        backend.hold_sinks().await;
        let controller = controller(&backend);

        let handle = controller.generate(listing_request()).await;
        controller.shutdown();

        tokio::time::timeout(Duration::from_secs(1), handle.wait())
            .await
            .unwrap();
        assert!(controller.store().is_generating().await);
    }
}
