//! Tentative and confirm-first list mutations.
//!
//! Two shapes cover every local-plus-backend change in the client:
//!
//! - [`OptimisticMutator::apply_tentatively`]: apply locally, commit
//!   remotely, and on failure revert by reloading the authoritative state.
//!   At most one tentative window is open per mutator.
//! - [`commit_then_apply`]: commit remotely first and touch local state only
//!   after the backend confirmed.

use std::future::Future;

use listcraft_core::error::{ListcraftError, Result};
use tokio::sync::Mutex;

use crate::observable::Observable;

/// Serialises tentative mutations of one resource.
pub struct OptimisticMutator {
    resource: &'static str,
    window: Mutex<()>,
}

impl OptimisticMutator {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            window: Mutex::new(()),
        }
    }

    /// Whether a tentative change is waiting for confirmation or rollback.
    pub fn is_pending(&self) -> bool {
        self.window.try_lock().is_err()
    }

    /// Applies `apply` to local state, then runs `commit`.
    ///
    /// On commit failure `revert` receives the error and must resynchronise
    /// local state (typically a reload from the backend); the error is then
    /// returned. The window stays closed for other callers until the revert
    /// finished.
    ///
    /// # Errors
    ///
    /// - `MutationPending` if another tentative change of this resource is open
    /// - whatever `apply` rejects with (nothing applied, no commit issued)
    /// - the commit error, after `revert` ran
    pub async fn apply_tentatively<S, Apply, Commit, CommitFut, Revert, RevertFut>(
        &self,
        state: &Observable<S>,
        apply: Apply,
        commit: Commit,
        revert: Revert,
    ) -> Result<()>
    where
        Apply: FnOnce(&mut S) -> Result<()>,
        Commit: FnOnce() -> CommitFut,
        CommitFut: Future<Output = Result<()>>,
        Revert: FnOnce(ListcraftError) -> RevertFut,
        RevertFut: Future<Output = ()>,
    {
        let _window = self
            .window
            .try_lock()
            .map_err(|_| ListcraftError::MutationPending {
                resource: self.resource,
            })?;

        let mut rejection = None;
        state
            .try_update(|s| match apply(s) {
                Ok(()) => Some(()),
                Err(err) => {
                    rejection = Some(err);
                    None
                }
            })
            .await;
        if let Some(err) = rejection {
            return Err(err);
        }

        match commit().await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(
                    "[OptimisticMutator] {} commit failed, reverting: {}",
                    self.resource,
                    err
                );
                revert(err.clone()).await;
                Err(err)
            }
        }
    }
}

/// Runs `commit` and, only if it succeeds, applies `apply` to local state.
///
/// # Errors
///
/// Returns the commit error; local state is untouched in that case.
pub async fn commit_then_apply<S, R, Commit, CommitFut, Apply>(
    state: &Observable<S>,
    commit: Commit,
    apply: Apply,
) -> Result<R>
where
    Commit: FnOnce() -> CommitFut,
    CommitFut: Future<Output = Result<()>>,
    Apply: FnOnce(&mut S) -> R,
{
    commit().await?;
    Ok(state.update(apply).await)
}
