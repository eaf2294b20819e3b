//! Scriptable in-process backend for application tests.

use std::collections::HashMap;

use async_trait::async_trait;
use listcraft_core::brand_voice::{BrandVoice, NewBrandVoice};
use listcraft_core::commands::{
    BrandVoiceCommands, ExportCommands, GenerationCommands, LicenseCommands, ListingCommands,
    PhotoCommands, SettingsCommands,
};
use listcraft_core::error::{ListcraftError, Result};
use listcraft_core::generation::{
    EmailParams, EventSink, GenerationRecord, GenerationType, ListingParams, SocialParams,
    StreamEvent,
};
use listcraft_core::license::LicenseStatus;
use listcraft_core::photo::PhotoRecord;
use tokio::sync::{Mutex, oneshot};

pub(crate) fn record(
    id: &str,
    generation_type: GenerationType,
    is_favorite: bool,
) -> GenerationRecord {
    GenerationRecord {
        id: id.to_string(),
        property_id: "prop-1".to_string(),
        content: format!("content of {id}"),
        generation_type,
        style: None,
        tone: None,
        length: None,
        seo_keywords: Vec::new(),
        brand_voice_id: None,
        tokens_used: 100,
        generation_cost_cents: 1,
        is_favorite,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

pub(crate) fn photo(id: &str, sort_order: u32) -> PhotoRecord {
    PhotoRecord {
        id: id.to_string(),
        property_id: "prop-1".to_string(),
        filename: format!("{id}.jpg"),
        original_path: format!("/photos/{id}.jpg"),
        thumbnail_path: format!("/thumbs/{id}.jpg"),
        sort_order,
        caption: None,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

pub(crate) fn voice(id: &str, name: &str) -> BrandVoice {
    BrandVoice {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        extracted_style: "{}".to_string(),
        source_listings: "[]".to_string(),
        sample_count: 2,
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

/// Handles for a paused backend call.
pub(crate) struct Pause {
    pub entered: oneshot::Receiver<()>,
    pub release: oneshot::Sender<()>,
}

struct PauseSlot {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
struct Inner {
    listings: Vec<GenerationRecord>,
    photos: Vec<PhotoRecord>,
    import_batch: Vec<PhotoRecord>,
    settings: HashMap<String, String>,
    voices: Vec<BrandVoice>,
    license: LicenseStatus,
    export_bytes: Vec<u8>,
    script: Vec<StreamEvent>,
    hold_sinks: bool,
    held_sinks: Vec<EventSink>,
    failures: HashMap<&'static str, String>,
    calls: Vec<&'static str>,
}

/// Records calls, serves canned data and fails on demand.
#[derive(Default)]
pub(crate) struct MockBackend {
    inner: Mutex<Inner>,
    pauses: Mutex<HashMap<&'static str, PauseSlot>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_listings(&self, listings: Vec<GenerationRecord>) {
        self.inner.lock().await.listings = listings;
    }

    pub async fn set_photos(&self, photos: Vec<PhotoRecord>) {
        self.inner.lock().await.photos = photos;
    }

    pub async fn backend_photos(&self) -> Vec<PhotoRecord> {
        self.inner.lock().await.photos.clone()
    }

    pub async fn set_import_batch(&self, photos: Vec<PhotoRecord>) {
        self.inner.lock().await.import_batch = photos;
    }

    pub async fn set_setting_value(&self, key: &str, value: &str) {
        self.inner
            .lock()
            .await
            .settings
            .insert(key.to_string(), value.to_string());
    }

    pub async fn setting_value(&self, key: &str) -> Option<String> {
        self.inner.lock().await.settings.get(key).cloned()
    }

    pub async fn set_voices(&self, voices: Vec<BrandVoice>) {
        self.inner.lock().await.voices = voices;
    }

    pub async fn set_license(&self, status: LicenseStatus) {
        self.inner.lock().await.license = status;
    }

    pub async fn set_export_bytes(&self, bytes: Vec<u8>) {
        self.inner.lock().await.export_bytes = bytes;
    }

    /// Events delivered synchronously by the next generation calls.
    pub async fn script(&self, events: Vec<StreamEvent>) {
        self.inner.lock().await.script = events;
    }

    /// Keeps generation sinks alive after the call returns.
    pub async fn hold_sinks(&self) {
        self.inner.lock().await.hold_sinks = true;
    }

    pub async fn take_sink(&self) -> Option<EventSink> {
        self.inner.lock().await.held_sinks.pop()
    }

    pub async fn fail(&self, method: &'static str, message: &str) {
        self.inner
            .lock()
            .await
            .failures
            .insert(method, message.to_string());
    }

    pub async fn clear_failures(&self) {
        self.inner.lock().await.failures.clear();
    }

    pub async fn calls_to(&self, method: &str) -> usize {
        self.inner
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| **c == method)
            .count()
    }

    /// Blocks the next call to `method` until the returned `release` fires.
    pub async fn pause(&self, method: &'static str) -> Pause {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.pauses.lock().await.insert(
            method,
            PauseSlot {
                entered: entered_tx,
                release: release_rx,
            },
        );
        Pause {
            entered: entered_rx,
            release: release_tx,
        }
    }

    async fn enter(&self, method: &'static str) -> Result<()> {
        let slot = self.pauses.lock().await.remove(method);
        if let Some(slot) = slot {
            let _ = slot.entered.send(());
            let _ = slot.release.await;
        }
        let mut inner = self.inner.lock().await;
        inner.calls.push(method);
        match inner.failures.get(method) {
            Some(message) => Err(ListcraftError::command(message.clone())),
            None => Ok(()),
        }
    }

    async fn stream(&self, method: &'static str, sink: EventSink) -> Result<()> {
        self.enter(method).await?;
        let mut inner = self.inner.lock().await;
        for event in inner.script.clone() {
            let _ = sink.send(event);
        }
        if inner.hold_sinks {
            inner.held_sinks.push(sink);
        }
        Ok(())
    }
}

#[async_trait]
impl GenerationCommands for MockBackend {
    async fn generate_listing(&self, _params: ListingParams, sink: EventSink) -> Result<()> {
        self.stream("generate_listing", sink).await
    }

    async fn generate_social(&self, _params: SocialParams, sink: EventSink) -> Result<()> {
        self.stream("generate_social", sink).await
    }

    async fn generate_email(&self, _params: EmailParams, sink: EventSink) -> Result<()> {
        self.stream("generate_email", sink).await
    }
}

#[async_trait]
impl ListingCommands for MockBackend {
    async fn list_listings(&self, property_id: &str) -> Result<Vec<GenerationRecord>> {
        self.enter("list_listings").await?;
        Ok(self
            .inner
            .lock()
            .await
            .listings
            .iter()
            .filter(|r| r.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn toggle_listing_favorite(&self, id: &str) -> Result<()> {
        self.enter("toggle_listing_favorite").await?;
        let mut inner = self.inner.lock().await;
        if let Some(r) = inner.listings.iter_mut().find(|r| r.id == id) {
            r.is_favorite = !r.is_favorite;
        }
        Ok(())
    }

    async fn delete_listing(&self, id: &str) -> Result<()> {
        self.enter("delete_listing").await?;
        self.inner.lock().await.listings.retain(|r| r.id != id);
        Ok(())
    }
}

#[async_trait]
impl PhotoCommands for MockBackend {
    async fn list_photos(&self, _property_id: &str) -> Result<Vec<PhotoRecord>> {
        self.enter("list_photos").await?;
        Ok(self.inner.lock().await.photos.clone())
    }

    async fn import_photos(&self, _property_id: &str) -> Result<Vec<PhotoRecord>> {
        self.enter("import_photos").await?;
        let mut inner = self.inner.lock().await;
        let batch = std::mem::take(&mut inner.import_batch);
        inner.photos.extend(batch.iter().cloned());
        Ok(batch)
    }

    async fn delete_photo(&self, id: &str) -> Result<()> {
        self.enter("delete_photo").await?;
        self.inner.lock().await.photos.retain(|p| p.id != id);
        Ok(())
    }

    async fn reorder_photos(&self, _property_id: &str, ordered_ids: &[String]) -> Result<()> {
        self.enter("reorder_photos").await?;
        let mut inner = self.inner.lock().await;
        let reordered = listcraft_core::photo::reorder(&inner.photos, ordered_ids)?;
        inner.photos = reordered;
        Ok(())
    }
}

#[async_trait]
impl SettingsCommands for MockBackend {
    async fn get_setting(&self, key: &str) -> Result<String> {
        self.enter("get_setting").await?;
        self.inner
            .lock()
            .await
            .settings
            .get(key)
            .cloned()
            .ok_or_else(|| ListcraftError::not_found("Setting", key))
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.enter("set_setting").await?;
        self.set_setting_value(key, value).await;
        Ok(())
    }
}

#[async_trait]
impl BrandVoiceCommands for MockBackend {
    async fn create_brand_voice(&self, input: NewBrandVoice) -> Result<BrandVoice> {
        self.enter("create_brand_voice").await?;
        let mut inner = self.inner.lock().await;
        let created = BrandVoice {
            sample_count: input.sample_listings.len() as u32,
            description: input.description,
            ..voice(&format!("bv-{}", inner.voices.len() + 1), &input.name)
        };
        inner.voices.push(created.clone());
        Ok(created)
    }

    async fn list_brand_voices(&self) -> Result<Vec<BrandVoice>> {
        self.enter("list_brand_voices").await?;
        Ok(self.inner.lock().await.voices.clone())
    }

    async fn delete_brand_voice(&self, id: &str) -> Result<()> {
        self.enter("delete_brand_voice").await?;
        self.inner.lock().await.voices.retain(|v| v.id != id);
        Ok(())
    }
}

#[async_trait]
impl ExportCommands for MockBackend {
    async fn export_pdf(&self, _property_id: &str, _listing_ids: &[String]) -> Result<Vec<u8>> {
        self.enter("export_pdf").await?;
        Ok(self.inner.lock().await.export_bytes.clone())
    }

    async fn export_docx(&self, _property_id: &str, _listing_ids: &[String]) -> Result<Vec<u8>> {
        self.enter("export_docx").await?;
        Ok(self.inner.lock().await.export_bytes.clone())
    }
}

#[async_trait]
impl LicenseCommands for MockBackend {
    async fn check_license(&self) -> Result<LicenseStatus> {
        self.enter("check_license").await?;
        Ok(self.inner.lock().await.license.clone())
    }

    async fn validate_license_key(&self, license_key: &str) -> Result<LicenseStatus> {
        self.enter("validate_license_key").await?;
        let mut inner = self.inner.lock().await;
        inner.license = LicenseStatus {
            is_valid: true,
            license_key: license_key.to_string(),
            validated_at: "2024-01-01T00:00:00Z".to_string(),
            error: None,
        };
        Ok(inner.license.clone())
    }
}
