//! Async generation store.
//!
//! Wraps the pure [`GenerationState`] with backend access for history and
//! with change notification for renderers. One store exists per generation
//! surface (listing, social, email).

use std::sync::Arc;

use listcraft_core::commands::ListingCommands;
use listcraft_core::error::Result;
use listcraft_core::generation::{
    GenerationRecord, GenerationSession, GenerationState, GenerationUsage, SessionId, StreamEvent,
    listing_history,
};
use tokio::sync::watch;

use crate::observable::Observable;
use crate::optimistic::commit_then_apply;

pub struct GenerationStore {
    state: Observable<GenerationState>,
    listings: Arc<dyn ListingCommands>,
}

impl GenerationStore {
    pub fn new(listings: Arc<dyn ListingCommands>) -> Self {
        Self {
            state: Observable::new(GenerationState::new()),
            listings,
        }
    }

    // ============================================================================
    // Reads
    // ============================================================================

    pub async fn session(&self) -> GenerationSession {
        self.state.read().await.session().clone()
    }

    pub async fn is_generating(&self) -> bool {
        self.state.read().await.session().is_generating()
    }

    pub async fn current_session(&self) -> Option<SessionId> {
        self.state.read().await.current_session()
    }

    pub async fn history(&self) -> Vec<GenerationRecord> {
        self.state.read().await.history().to_vec()
    }

    pub async fn is_loading_history(&self) -> bool {
        self.state.read().await.is_loading_history()
    }

    /// Revision counter bumped after every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.state.subscribe()
    }

    // ============================================================================
    // Session transitions
    // ============================================================================

    pub async fn start_generation(&self) -> SessionId {
        self.state.update(GenerationState::start_generation).await
    }

    /// Appends to the live session. Ignored outside `Generating`.
    pub async fn append_delta(&self, text: &str) {
        let applied = self
            .state
            .try_update(|s| s.append_delta(text).then_some(()))
            .await;
        if applied.is_none() {
            tracing::debug!("[GenerationStore] Dropped delta outside an active generation");
        }
    }

    pub async fn finish_generation(&self, full_text: String) {
        self.state.update(|s| s.finish_generation(full_text)).await;
    }

    pub async fn set_error(&self, message: String) {
        self.state.update(|s| s.set_error(message)).await;
    }

    pub async fn reset_generation(&self) {
        self.state.update(GenerationState::reset_generation).await;
    }

    /// Applies `event` if `session_id` is still the live session.
    ///
    /// Returns `false` for events of a superseded or reset session. The
    /// check and the transition happen under the same lock.
    pub async fn apply_event(&self, session_id: SessionId, event: &StreamEvent) -> bool {
        self.state
            .try_update(|s| {
                if !s.is_current(session_id) {
                    return None;
                }
                match event {
                    StreamEvent::Started { estimated_tokens } => {
                        s.record_estimate(*estimated_tokens)
                    }
                    StreamEvent::Delta { text } => {
                        s.append_delta(text);
                    }
                    StreamEvent::Finished {
                        full_text,
                        input_tokens,
                        output_tokens,
                        cost_cents,
                    } => {
                        s.finish_generation(full_text.clone());
                        s.record_usage(GenerationUsage {
                            input_tokens: *input_tokens,
                            output_tokens: *output_tokens,
                            cost_cents: *cost_cents,
                        });
                    }
                    StreamEvent::Error { message } => s.set_error(message.clone()),
                }
                Some(())
            })
            .await
            .is_some()
    }

    /// Records a failed request call for `session_id`, if it is still live.
    pub async fn fail_session(&self, session_id: SessionId, message: String) -> bool {
        self.state
            .try_update(|s| s.is_current(session_id).then(|| s.set_error(message)))
            .await
            .is_some()
    }

    /// Errors a session whose event stream ended without a terminal event.
    pub async fn abandon_session(&self, session_id: SessionId, message: String) -> bool {
        self.state
            .try_update(|s| {
                (s.is_current(session_id) && s.session().is_generating())
                    .then(|| s.set_error(message))
            })
            .await
            .is_some()
    }

    // ============================================================================
    // History
    // ============================================================================

    /// Replaces history with the property's listing-type records.
    ///
    /// History is supplementary: any backend failure leaves an empty list
    /// instead of an error. When loads overlap, only the most recently
    /// started one is installed.
    pub async fn load_generations(&self, property_id: &str) {
        let ticket = self.state.update(GenerationState::begin_history_load).await;

        let records = match self.listings.list_listings(property_id).await {
            Ok(records) => listing_history(records),
            Err(e) => {
                tracing::warn!(
                    "[GenerationStore] Failed to load history for {}: {}",
                    property_id,
                    e
                );
                Vec::new()
            }
        };

        let count = records.len();
        let installed = self
            .state
            .try_update(|s| s.finish_history_load(ticket, records).then_some(()))
            .await
            .is_some();

        if installed {
            tracing::debug!(
                "[GenerationStore] Loaded {} listing(s) for {}",
                count,
                property_id
            );
        } else {
            tracing::debug!(
                "[GenerationStore] Dropped superseded history load for {}",
                property_id
            );
        }
    }

    /// Toggles the favorite flag, backend first.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the local flag is unchanged in that case.
    pub async fn toggle_favorite(&self, id: &str) -> Result<()> {
        commit_then_apply(
            &self.state,
            || self.listings.toggle_listing_favorite(id),
            |s| {
                s.flip_favorite(id);
            },
        )
        .await
    }

    /// Deletes a record, backend first.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the record stays in history in that case.
    pub async fn delete_generation(&self, id: &str) -> Result<()> {
        commit_then_apply(
            &self.state,
            || self.listings.delete_listing(id),
            |s| {
                s.remove_record(id);
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockBackend, record};
    use listcraft_core::generation::{GenerationStatus, GenerationType};

    fn store(backend: &Arc<MockBackend>) -> GenerationStore {
        GenerationStore::new(backend.clone())
    }

    #[tokio::test]
    async fn test_load_generations_keeps_only_listings_in_order() {
        let backend = Arc::new(MockBackend::new());
        backend
            .set_listings(vec![
                record("l-2", GenerationType::Listing, false),
                record("s-1", GenerationType::SocialFacebook, false),
                record("l-1", GenerationType::Listing, false),
                record("e-1", GenerationType::EmailSeller, false),
            ])
            .await;
        let store = store(&backend);

        store.load_generations("prop-1").await;

        let ids: Vec<_> = store.history().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["l-2", "l-1"]);
        assert!(!store.is_loading_history().await);
    }

    #[tokio::test]
    async fn test_load_generations_failure_empties_history() {
        let backend = Arc::new(MockBackend::new());
        backend
            .set_listings(vec![record("l-1", GenerationType::Listing, false)])
            .await;
        let store = store(&backend);
        store.load_generations("prop-1").await;
        assert_eq!(store.history().await.len(), 1);

        backend.fail("list_listings", "disk unavailable").await;
        store.load_generations("prop-1").await;

        assert!(store.history().await.is_empty());
        assert!(!store.is_loading_history().await);
    }

    #[tokio::test]
    async fn test_late_history_load_does_not_overwrite_newer_property() {
        let backend = Arc::new(MockBackend::new());
        backend
            .set_listings(vec![
                GenerationRecord {
                    property_id: "prop-A".to_string(),
                    ..record("a-1", GenerationType::Listing, false)
                },
                GenerationRecord {
                    property_id: "prop-B".to_string(),
                    ..record("b-1", GenerationType::Listing, false)
                },
            ])
            .await;
        let store = Arc::new(store(&backend));
        let pause = backend.pause("list_listings").await;

        let slow = {
            let store = store.clone();
            tokio::spawn(async move { store.load_generations("prop-A").await })
        };
        pause.entered.await.unwrap();

        store.load_generations("prop-B").await;
        pause.release.send(()).unwrap();
        slow.await.unwrap();

        let ids: Vec<_> = store.history().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b-1"]);
        assert!(!store.is_loading_history().await);
    }

    #[tokio::test]
    async fn test_toggle_favorite_flips_only_target() {
        let backend = Arc::new(MockBackend::new());
        backend
            .set_listings(vec![
                record("l-1", GenerationType::Listing, false),
                record("l-2", GenerationType::Listing, true),
                record("l-3", GenerationType::Listing, false),
            ])
            .await;
        let store = store(&backend);
        store.load_generations("prop-1").await;

        store.toggle_favorite("l-1").await.unwrap();

        let flags: Vec<_> = store
            .history()
            .await
            .into_iter()
            .map(|r| r.is_favorite)
            .collect();
        assert_eq!(flags, vec![true, true, false]);
        assert_eq!(backend.calls_to("toggle_listing_favorite").await, 1);
    }

    #[tokio::test]
    async fn test_toggle_favorite_failure_is_not_committed() {
        let backend = Arc::new(MockBackend::new());
        backend
            .set_listings(vec![record("l-1", GenerationType::Listing, false)])
            .await;
        let store = store(&backend);
        store.load_generations("prop-1").await;
        backend.fail("toggle_listing_favorite", "locked").await;

        let result = store.toggle_favorite("l-1").await;

        assert!(result.is_err());
        assert!(!store.history().await[0].is_favorite);
    }

    #[tokio::test]
    async fn test_delete_generation() {
        let backend = Arc::new(MockBackend::new());
        backend
            .set_listings(vec![
                record("l-1", GenerationType::Listing, false),
                record("l-2", GenerationType::Listing, false),
            ])
            .await;
        let store = store(&backend);
        store.load_generations("prop-1").await;

        backend.fail("delete_listing", "locked").await;
        assert!(store.delete_generation("l-1").await.is_err());
        assert_eq!(store.history().await.len(), 2);

        backend.clear_failures().await;
        store.delete_generation("l-1").await.unwrap();
        let ids: Vec<_> = store.history().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["l-2"]);
    }

    #[tokio::test]
    async fn test_apply_event_ignores_superseded_session() {
        let backend = Arc::new(MockBackend::new());
        let store = store(&backend);

        let old = store.start_generation().await;
        let new = store.start_generation().await;

        let stale = StreamEvent::Delta {
            text: "stale".to_string(),
        };
        assert!(!store.apply_event(old, &stale).await);
        assert!(
            store
                .apply_event(
                    new,
                    &StreamEvent::Delta {
                        text: "fresh".to_string()
                    }
                )
                .await
        );

        assert_eq!(store.session().await.accumulated_text, "fresh");
    }

    #[tokio::test]
    async fn test_reset_discards_output() {
        let backend = Arc::new(MockBackend::new());
        let store = store(&backend);
        let id = store.start_generation().await;
        store.append_delta("draft").await;

        store.reset_generation().await;

        assert_eq!(store.session().await.status, GenerationStatus::Idle);
        assert!(
            !store
                .apply_event(
                    id,
                    &StreamEvent::Delta {
                        text: "late".to_string()
                    }
                )
                .await
        );
        assert_eq!(store.session().await.accumulated_text, "");
    }
}
