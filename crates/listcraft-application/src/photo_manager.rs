//! Photo list of the open property.
//!
//! Reordering is optimistic: the new order is visible immediately and a
//! failed commit reloads the backend order. Import and delete touch local
//! state only after the backend answered.

use std::sync::Arc;

use listcraft_core::commands::PhotoCommands;
use listcraft_core::error::{ListcraftError, Result};
use listcraft_core::photo::{self, MAX_PHOTOS, PhotoRecord};
use tokio::sync::watch;

use crate::observable::Observable;
use crate::optimistic::{OptimisticMutator, commit_then_apply};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoState {
    pub property_id: Option<String>,
    pub photos: Vec<PhotoRecord>,
    pub is_loading: bool,
    pub is_importing: bool,
    pub error: Option<String>,
}

/// Result of a photo mutation. Failures are also recorded in
/// [`PhotoState::error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Committed,
    /// The backend refused; local state was never touched.
    Failed,
    /// The backend refused a tentative change; local state was reloaded.
    RolledBack,
    /// Refused locally before reaching the backend.
    Rejected,
}

pub struct PhotoManager {
    commands: Arc<dyn PhotoCommands>,
    state: Observable<PhotoState>,
    order: OptimisticMutator,
}

impl PhotoManager {
    pub fn new(commands: Arc<dyn PhotoCommands>) -> Self {
        Self {
            commands,
            state: Observable::new(PhotoState::default()),
            order: OptimisticMutator::new("photo order"),
        }
    }

    pub async fn state(&self) -> PhotoState {
        self.state.snapshot().await
    }

    pub async fn photos(&self) -> Vec<PhotoRecord> {
        self.state.read().await.photos.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.state.subscribe()
    }

    pub fn is_reorder_pending(&self) -> bool {
        self.order.is_pending()
    }

    /// Switches to `property_id` and loads its photos.
    pub async fn open(&self, property_id: &str) {
        self.state
            .update(|s| {
                *s = PhotoState {
                    property_id: Some(property_id.to_string()),
                    ..PhotoState::default()
                }
            })
            .await;
        self.load_photos().await;
    }

    /// Refreshes from the backend. A failure keeps the current list.
    pub async fn load_photos(&self) {
        let Some(property_id) = self.property_id().await else {
            return;
        };

        self.state
            .update(|s| {
                s.is_loading = true;
                s.error = None;
            })
            .await;

        let result = self.commands.list_photos(&property_id).await;

        self.state
            .update(|s| {
                s.is_loading = false;
                match result {
                    Ok(photos) => {
                        tracing::debug!(
                            "[PhotoManager] Loaded {} photo(s) for {}",
                            photos.len(),
                            property_id
                        );
                        s.photos = photos;
                    }
                    Err(e) => {
                        tracing::warn!("[PhotoManager] Failed to load photos: {}", e);
                        s.error = Some(e.to_string());
                    }
                }
            })
            .await;
    }

    /// Imports user-picked files and appends whatever the backend created.
    pub async fn import_photos(&self) -> MutationOutcome {
        let Some(property_id) = self.property_id().await else {
            return MutationOutcome::Rejected;
        };

        let at_capacity = self
            .state
            .update(|s| {
                if s.photos.len() >= MAX_PHOTOS {
                    s.error = Some(format!("A property can have at most {MAX_PHOTOS} photos"));
                    return true;
                }
                s.is_importing = true;
                s.error = None;
                false
            })
            .await;
        if at_capacity {
            return MutationOutcome::Rejected;
        }

        let result = self.commands.import_photos(&property_id).await;

        self.state
            .update(|s| {
                s.is_importing = false;
                match result {
                    Ok(added) => {
                        if !added.is_empty() {
                            tracing::info!("[PhotoManager] Imported {} photo(s)", added.len());
                            s.photos.extend(added);
                        }
                        MutationOutcome::Committed
                    }
                    Err(e) => {
                        tracing::warn!("[PhotoManager] Import failed: {}", e);
                        s.error = Some(e.to_string());
                        MutationOutcome::Failed
                    }
                }
            })
            .await
    }

    pub async fn delete_photo(&self, id: &str) -> MutationOutcome {
        self.state.update(|s| s.error = None).await;

        let result = commit_then_apply(
            &self.state,
            || self.commands.delete_photo(id),
            |s| {
                s.photos.retain(|p| p.id != id);
                photo::renumber(&mut s.photos);
            },
        )
        .await;

        match result {
            Ok(()) => MutationOutcome::Committed,
            Err(e) => {
                tracing::warn!("[PhotoManager] Failed to delete photo {}: {}", id, e);
                self.record_error(&e).await;
                MutationOutcome::Failed
            }
        }
    }

    /// Shows `ordered_ids` as the new order right away, then commits it.
    ///
    /// `ordered_ids` must be a permutation of the current photos. Only one
    /// reorder is in flight at a time; another one is rejected until the
    /// first is confirmed or rolled back.
    pub async fn reorder_photos(&self, ordered_ids: &[String]) -> MutationOutcome {
        let Some(property_id) = self.property_id().await else {
            return MutationOutcome::Rejected;
        };

        let result = self
            .order
            .apply_tentatively(
                &self.state,
                |s| {
                    s.photos = photo::reorder(&s.photos, ordered_ids)?;
                    s.error = None;
                    Ok(())
                },
                || self.commands.reorder_photos(&property_id, ordered_ids),
                |_| self.load_photos(),
            )
            .await;

        match result {
            Ok(()) => MutationOutcome::Committed,
            Err(e @ (ListcraftError::MutationPending { .. } | ListcraftError::InvalidInput(_))) => {
                tracing::debug!("[PhotoManager] Reorder rejected: {}", e);
                self.record_error(&e).await;
                MutationOutcome::Rejected
            }
            Err(e) => {
                // The reload cleared the error field; the commit failure wins.
                self.record_error(&e).await;
                MutationOutcome::RolledBack
            }
        }
    }

    async fn property_id(&self) -> Option<String> {
        self.state.read().await.property_id.clone()
    }

    async fn record_error(&self, e: &ListcraftError) {
        let message = e.to_string();
        self.state.update(|s| s.error = Some(message)).await;
    }
}

/// Convenience for callers that want `Result` semantics.
impl MutationOutcome {
    pub fn into_result(self, state: &PhotoState) -> Result<()> {
        match self {
            Self::Committed => Ok(()),
            _ => Err(ListcraftError::command(
                state.error.clone().unwrap_or_default(),
            )),
        }
    }
}
