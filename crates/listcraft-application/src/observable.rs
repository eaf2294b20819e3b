//! Shared state cell with change notification.
//!
//! Every store in this crate keeps its state in an `Observable`. Mutations go
//! through [`Observable::update`] (or [`Observable::try_update`]), which bump
//! a revision counter that renderers can watch. Many updates between two
//! renders collapse into one wake-up, so a high-frequency delta stream never
//! forces one repaint per chunk.

use tokio::sync::{RwLock, RwLockReadGuard, watch};

pub struct Observable<S> {
    state: RwLock<S>,
    revision: watch::Sender<u64>,
}

impl<S> Observable<S> {
    pub fn new(initial: S) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: RwLock::new(initial),
            revision,
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, S> {
        self.state.read().await
    }

    /// Applies `f` under the write lock and notifies subscribers.
    pub async fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = {
            let mut state = self.state.write().await;
            f(&mut state)
        };
        self.bump();
        result
    }

    /// Like [`Self::update`], but only notifies when `f` returns `Some`.
    pub async fn try_update<R>(&self, f: impl FnOnce(&mut S) -> Option<R>) -> Option<R> {
        let result = {
            let mut state = self.state.write().await;
            f(&mut state)
        };
        if result.is_some() {
            self.bump();
        }
        result
    }

    /// Receiver that wakes whenever the revision changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }
}

impl<S: Clone> Observable<S> {
    pub async fn snapshot(&self) -> S {
        self.state.read().await.clone()
    }
}

impl<S: Default> Default for Observable<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
