use std::sync::Arc;

use listcraft_core::brand_voice::{BrandVoice, NewBrandVoice};
use listcraft_core::commands::BrandVoiceCommands;
use listcraft_core::error::{ListcraftError, Result};
use tokio::sync::watch;

use crate::observable::Observable;
use crate::optimistic::commit_then_apply;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandVoiceState {
    pub voices: Vec<BrandVoice>,
    pub is_loading: bool,
    pub is_creating: bool,
    pub error: Option<String>,
}

/// Local list of brand voices.
pub struct BrandVoiceCache {
    commands: Arc<dyn BrandVoiceCommands>,
    state: Observable<BrandVoiceState>,
}

impl BrandVoiceCache {
    pub fn new(commands: Arc<dyn BrandVoiceCommands>) -> Self {
        Self {
            commands,
            state: Observable::new(BrandVoiceState::default()),
        }
    }

    pub async fn state(&self) -> BrandVoiceState {
        self.state.snapshot().await
    }

    pub async fn voices(&self) -> Vec<BrandVoice> {
        self.state.read().await.voices.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.state.subscribe()
    }

    /// Refreshes the list. A failure empties it and records the error.
    pub async fn fetch_voices(&self) {
        self.state
            .update(|s| {
                s.is_loading = true;
                s.error = None;
            })
            .await;

        let result = self.commands.list_brand_voices().await;

        self.state
            .update(|s| {
                s.is_loading = false;
                match result {
                    Ok(voices) => s.voices = voices,
                    Err(e) => {
                        tracing::warn!("[BrandVoiceCache] Failed to list brand voices: {}", e);
                        s.voices.clear();
                        s.error = Some(e.to_string());
                    }
                }
            })
            .await;
    }

    /// Creates a voice and reloads the list.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it, so the caller can keep
    /// the creation form open.
    pub async fn create_voice(&self, input: NewBrandVoice) -> Result<BrandVoice> {
        self.state
            .update(|s| {
                s.is_creating = true;
                s.error = None;
            })
            .await;

        let result = async {
            let created = self.commands.create_brand_voice(input).await?;
            let voices = self.commands.list_brand_voices().await?;
            Ok::<_, ListcraftError>((created, voices))
        }
        .await;

        match result {
            Ok((created, voices)) => {
                tracing::info!(
                    "[BrandVoiceCache] Created brand voice '{}' from {} sample(s)",
                    created.name,
                    created.sample_count
                );
                self.state
                    .update(|s| {
                        s.voices = voices;
                        s.is_creating = false;
                    })
                    .await;
                Ok(created)
            }
            Err(e) => {
                let message = e.to_string();
                self.state
                    .update(|s| {
                        s.is_creating = false;
                        s.error = Some(message);
                    })
                    .await;
                Err(e)
            }
        }
    }

    /// Deletes a voice once the backend confirmed. Failures are recorded.
    pub async fn delete_voice(&self, id: &str) {
        let result = commit_then_apply(
            &self.state,
            || self.commands.delete_brand_voice(id),
            |s| s.voices.retain(|v| v.id != id),
        )
        .await;

        if let Err(e) = result {
            tracing::warn!("[BrandVoiceCache] Failed to delete brand voice {}: {}", id, e);
            let message = e.to_string();
            self.state.update(|s| s.error = Some(message)).await;
        }
    }
}
