use std::sync::Arc;

use futures::future::join_all;
use listcraft_core::commands::SettingsCommands;
use listcraft_core::error::Result;
use listcraft_core::settings::{SettingKey, SettingsSnapshot};
use tokio::sync::watch;

use crate::observable::Observable;

#[derive(Debug, Clone, Default)]
struct SettingsState {
    snapshot: SettingsSnapshot,
    is_loaded: bool,
}

/// Local mirror of the backend key/value settings.
pub struct SettingsCache {
    commands: Arc<dyn SettingsCommands>,
    state: Observable<SettingsState>,
}

impl SettingsCache {
    pub fn new(commands: Arc<dyn SettingsCommands>) -> Self {
        Self {
            commands,
            state: Observable::new(SettingsState::default()),
        }
    }

    pub async fn snapshot(&self) -> SettingsSnapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn get(&self, key: SettingKey) -> String {
        self.state.read().await.snapshot.get(key).to_string()
    }

    pub async fn has_api_key(&self) -> bool {
        self.state.read().await.snapshot.has_api_key()
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.is_loaded
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.state.subscribe()
    }

    /// Fetches every known key concurrently.
    ///
    /// A key that fails to load (including one that was never set) reads as
    /// the empty string.
    pub async fn load_settings(&self) {
        let fetches = SettingKey::all().map(|key| async move {
            match self.commands.get_setting(key.as_ref()).await {
                Ok(value) => (key, value),
                Err(e) => {
                    tracing::debug!("[SettingsCache] '{}' unavailable: {}", key, e);
                    (key, String::new())
                }
            }
        });
        let snapshot: SettingsSnapshot = join_all(fetches).await.into_iter().collect();

        tracing::debug!(
            "[SettingsCache] Loaded settings (api key present: {})",
            snapshot.has_api_key()
        );

        self.state
            .update(|s| {
                s.snapshot = snapshot;
                s.is_loaded = true;
            })
            .await;
    }

    /// Persists `value` and mirrors it locally once the backend accepted.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the cached value is unchanged in that case.
    pub async fn save_setting(&self, key: SettingKey, value: &str) -> Result<()> {
        self.commands.set_setting(key.as_ref(), value).await?;
        if key.is_secret() {
            tracing::info!("[SettingsCache] Saved '{}'", key);
        } else {
            tracing::info!("[SettingsCache] Saved '{}' = '{}'", key, value);
        }
        self.state.update(|s| s.snapshot.set(key, value)).await;
        Ok(())
    }
}
