use std::sync::Arc;

use listcraft_core::generation::{GenerationRequest, SessionId, StreamEvent};

use super::store::GenerationStore;

const STREAM_CLOSED_MESSAGE: &str = "Generation stream closed before completion";

/// What happened to one incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    Applied,
    /// The session is no longer the store's live session.
    Stale,
    /// The session already saw `finished` or `error`.
    AfterTerminal,
}

/// Routes the events of one generation session into its store.
pub(crate) struct StreamSession {
    id: SessionId,
    property_id: String,
    feeds_history: bool,
    store: Arc<GenerationStore>,
    closed: bool,
}

impl StreamSession {
    pub fn new(id: SessionId, request: &GenerationRequest, store: Arc<GenerationStore>) -> Self {
        Self {
            id,
            property_id: request.property_id().to_string(),
            feeds_history: request.feeds_listing_history(),
            store,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub async fn handle(&mut self, event: StreamEvent) -> EventDisposition {
        if self.closed {
            tracing::debug!(
                "[StreamSession] {} ignoring '{}' after terminal event",
                self.id,
                event.tag()
            );
            return EventDisposition::AfterTerminal;
        }

        if !self.store.apply_event(self.id, &event).await {
            tracing::debug!(
                "[StreamSession] {} is stale, dropping '{}'",
                self.id,
                event.tag()
            );
            return EventDisposition::Stale;
        }

        match &event {
            StreamEvent::Finished { output_tokens, .. } => {
                self.closed = true;
                tracing::info!(
                    "[StreamSession] {} finished ({} output tokens)",
                    self.id,
                    output_tokens
                );
                if self.feeds_history {
                    self.spawn_history_reload();
                }
            }
            StreamEvent::Error { message } => {
                self.closed = true;
                tracing::warn!("[StreamSession] {} failed: {}", self.id, message);
            }
            _ => {}
        }

        EventDisposition::Applied
    }

    /// Marks the session errored when the transport went away mid-stream.
    pub async fn close_unfinished(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self
            .store
            .abandon_session(self.id, STREAM_CLOSED_MESSAGE.to_string())
            .await
        {
            tracing::warn!("[StreamSession] {} stream closed early", self.id);
        }
    }

    fn spawn_history_reload(&self) {
        let store = self.store.clone();
        let property_id = self.property_id.clone();
        tokio::spawn(async move {
            store.load_generations(&property_id).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockBackend, record};
    use listcraft_core::generation::{
        GenerationStatus, GenerationType, ListingLength, ListingParams, ListingStyle, ListingTone,
        SocialParams, SocialPlatform,
    };
    use std::time::Duration;

    fn listing_request() -> GenerationRequest {
        GenerationRequest::Listing(ListingParams {
            property_id: "prop-1".to_string(),
            style: ListingStyle::Luxury,
            tone: ListingTone::Warm,
            length: ListingLength::Medium,
            seo_keywords: Vec::new(),
            brand_voice_id: None,
        })
    }

    fn finished(text: &str) -> StreamEvent {
        StreamEvent::Finished {
            full_text: text.to_string(),
            input_tokens: 10,
            output_tokens: 20,
            cost_cents: 1,
        }
    }

    #[tokio::test]
    async fn test_events_after_terminal_are_ignored() {
        let backend = Arc::new(MockBackend::new());
        let store = Arc::new(GenerationStore::new(backend.clone()));
        let id = store.start_generation().await;
        let mut session = StreamSession::new(id, &listing_request(), store.clone());

        session.handle(finished("Done.")).await;
        let late = session
            .handle(StreamEvent::Delta {
                text: " extra".to_string(),
            })
            .await;

        assert_eq!(late, EventDisposition::AfterTerminal);
        assert_eq!(store.session().await.accumulated_text, "Done.");
    }

    #[tokio::test]
    async fn test_listing_finish_reloads_history() {
        let backend = Arc::new(MockBackend::new());
        backend
            .set_listings(vec![record("l-1", GenerationType::Listing, false)])
            .await;
        let store = Arc::new(GenerationStore::new(backend.clone()));
        let mut revisions = store.subscribe();
        let id = store.start_generation().await;
        let mut session = StreamSession::new(id, &listing_request(), store.clone());

        session.handle(finished("Done.")).await;

        tokio::time::timeout(Duration::from_secs(1), async {
            while store.history().await.is_empty() {
                revisions.changed().await.unwrap();
            }
        })
        .await
        .unwrap();
        assert_eq!(backend.calls_to("list_listings").await, 1);
    }

    #[tokio::test]
    async fn test_social_finish_skips_history_reload() {
        let backend = Arc::new(MockBackend::new());
        let store = Arc::new(GenerationStore::new(backend.clone()));
        let id = store.start_generation().await;
        let request = GenerationRequest::Social(SocialParams {
            property_id: "prop-1".to_string(),
            platform: SocialPlatform::Instagram,
            brand_voice_id: None,
        });
        let mut session = StreamSession::new(id, &request, store.clone());

        session.handle(finished("#home")).await;
        tokio::task::yield_now().await;

        assert_eq!(backend.calls_to("list_listings").await, 0);
    }

    #[tokio::test]
    async fn test_close_unfinished_errors_live_session() {
        let backend = Arc::new(MockBackend::new());
        let store = Arc::new(GenerationStore::new(backend.clone()));
        let id = store.start_generation().await;
        let mut session = StreamSession::new(id, &listing_request(), store.clone());
        session
            .handle(StreamEvent::Delta {
                text: "Half".to_string(),
            })
            .await;

        session.close_unfinished().await;

        let state = store.session().await;
        assert_eq!(state.status, GenerationStatus::Errored);
        assert_eq!(state.accumulated_text, "Half");
        assert_eq!(state.error_message.as_deref(), Some(STREAM_CLOSED_MESSAGE));
    }
}
