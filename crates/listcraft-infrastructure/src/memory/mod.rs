//! In-process backend.
//!
//! Implements the whole command surface over in-memory tables. Generation
//! requests stream template copy (see `copywriter`) through the event sink
//! from a spawned task, paced by [`LocalBackendConfig`].

mod copywriter;
mod streaming;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use listcraft_core::brand_voice::{BrandVoice, ExtractedStyle, NewBrandVoice};
use listcraft_core::commands::{
    BrandVoiceCommands, ExportCommands, LicenseCommands, ListingCommands, PhotoCommands,
    SettingsCommands,
};
use listcraft_core::config::LocalBackendConfig;
use listcraft_core::error::{ListcraftError, Result};
use listcraft_core::generation::GenerationRecord;
use listcraft_core::license::LicenseStatus;
use listcraft_core::photo::{self, MAX_PHOTOS, PhotoRecord};
use listcraft_core::settings::{AgentInfo, SettingKey};
use tokio::sync::RwLock;

const LICENSE_SETTING: &str = "license_key";

#[derive(Debug, Default)]
pub(crate) struct Tables {
    /// Newest first.
    listings: Vec<GenerationRecord>,
    photos: Vec<PhotoRecord>,
    staged_imports: HashMap<String, Vec<PathBuf>>,
    settings: HashMap<String, String>,
    voices: Vec<BrandVoice>,
}

impl Tables {
    fn setting(&self, key: SettingKey) -> String {
        self.settings.get(key.as_ref()).cloned().unwrap_or_default()
    }

    fn agent_info(&self) -> AgentInfo {
        AgentInfo {
            name: self.setting(SettingKey::AgentName),
            phone: self.setting(SettingKey::AgentPhone),
            email: self.setting(SettingKey::AgentEmail),
            brokerage_name: self.setting(SettingKey::BrokerageName),
        }
    }

    fn voice_name(&self, id: Option<&str>) -> Result<Option<String>> {
        match id {
            None => Ok(None),
            Some(id) => self
                .voices
                .iter()
                .find(|v| v.id == id)
                .map(|v| Some(v.name.clone()))
                .ok_or_else(|| ListcraftError::not_found("BrandVoice", id)),
        }
    }

    fn property_photos(&self, property_id: &str) -> Vec<PhotoRecord> {
        let mut photos: Vec<_> = self
            .photos
            .iter()
            .filter(|p| p.property_id == property_id)
            .cloned()
            .collect();
        photos.sort_by_key(|p| p.sort_order);
        photos
    }
}

pub struct InMemoryBackend {
    config: LocalBackendConfig,
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryBackend {
    pub fn new(config: LocalBackendConfig) -> Self {
        Self {
            config,
            tables: Default::default(),
        }
    }

    /// Queues files the next `import_photos` for `property_id` will "pick".
    pub async fn stage_imports(&self, property_id: &str, paths: Vec<PathBuf>) {
        self.tables
            .write()
            .await
            .staged_imports
            .entry(property_id.to_string())
            .or_default()
            .extend(paths);
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl ListingCommands for InMemoryBackend {
    async fn list_listings(&self, property_id: &str) -> Result<Vec<GenerationRecord>> {
        Ok(self
            .tables
            .read()
            .await
            .listings
            .iter()
            .filter(|r| r.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn toggle_listing_favorite(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let record = tables
            .listings
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ListcraftError::not_found("Listing", id))?;
        record.is_favorite = !record.is_favorite;
        Ok(())
    }

    async fn delete_listing(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.listings.len();
        tables.listings.retain(|r| r.id != id);
        if tables.listings.len() == before {
            return Err(ListcraftError::not_found("Listing", id));
        }
        Ok(())
    }
}

#[async_trait]
impl PhotoCommands for InMemoryBackend {
    async fn list_photos(&self, property_id: &str) -> Result<Vec<PhotoRecord>> {
        Ok(self.tables.read().await.property_photos(property_id))
    }

    async fn import_photos(&self, property_id: &str) -> Result<Vec<PhotoRecord>> {
        let mut tables = self.tables.write().await;
        let picked = tables.staged_imports.remove(property_id).unwrap_or_default();
        if picked.is_empty() {
            return Ok(Vec::new());
        }

        let existing = tables.property_photos(property_id).len();
        let room = MAX_PHOTOS.saturating_sub(existing);
        if room == 0 {
            return Err(ListcraftError::command(format!(
                "Maximum of {MAX_PHOTOS} photos per property"
            )));
        }
        if picked.len() > room {
            tracing::warn!(
                "[InMemoryBackend] Importing {} of {} picked photos (limit {})",
                room,
                picked.len(),
                MAX_PHOTOS
            );
        }

        let created_at = now();
        let added: Vec<PhotoRecord> = picked
            .iter()
            .take(room)
            .enumerate()
            .map(|(i, path)| photo_record(property_id, path, (existing + i) as u32, &created_at))
            .collect();
        tables.photos.extend(added.iter().cloned());
        Ok(added)
    }

    async fn delete_photo(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let property_id = tables
            .photos
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.property_id.clone())
            .ok_or_else(|| ListcraftError::not_found("Photo", id))?;
        tables.photos.retain(|p| p.id != id);

        let mut photos = tables.property_photos(&property_id);
        photo::renumber(&mut photos);
        tables.photos.retain(|p| p.property_id != property_id);
        tables.photos.extend(photos);
        Ok(())
    }

    async fn reorder_photos(&self, property_id: &str, ordered_ids: &[String]) -> Result<()> {
        let mut tables = self.tables.write().await;
        let reordered = photo::reorder(&tables.property_photos(property_id), ordered_ids)?;
        tables.photos.retain(|p| p.property_id != property_id);
        tables.photos.extend(reordered);
        tracing::debug!(
            "[InMemoryBackend] Reordered {} photo(s) for {}",
            ordered_ids.len(),
            property_id
        );
        Ok(())
    }
}

fn photo_record(property_id: &str, path: &Path, sort_order: u32, created_at: &str) -> PhotoRecord {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    PhotoRecord {
        id: new_id(),
        property_id: property_id.to_string(),
        filename,
        original_path: path.display().to_string(),
        thumbnail_path: path.display().to_string(),
        sort_order,
        caption: None,
        created_at: created_at.to_string(),
    }
}

#[async_trait]
impl SettingsCommands for InMemoryBackend {
    async fn get_setting(&self, key: &str) -> Result<String> {
        self.tables
            .read()
            .await
            .settings
            .get(key)
            .cloned()
            .ok_or_else(|| ListcraftError::not_found("Setting", key))
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.tables
            .write()
            .await
            .settings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl BrandVoiceCommands for InMemoryBackend {
    async fn create_brand_voice(&self, input: NewBrandVoice) -> Result<BrandVoice> {
        if input.name.trim().is_empty() {
            return Err(ListcraftError::invalid_input("Brand voice name is required"));
        }
        let samples: Vec<&String> = input
            .sample_listings
            .iter()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if samples.is_empty() {
            return Err(ListcraftError::invalid_input(
                "At least one sample listing is required",
            ));
        }

        let style = ExtractedStyle {
            tone: "consistent with samples".to_string(),
            vocabulary: longest_words(&samples),
            ..ExtractedStyle::default()
        };
        let timestamp = now();
        let voice = BrandVoice {
            id: new_id(),
            name: input.name.trim().to_string(),
            description: input.description,
            extracted_style: serde_json::to_string(&style)?,
            source_listings: serde_json::to_string(&samples)?,
            sample_count: samples.len() as u32,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        tracing::info!(
            "[InMemoryBackend] Created brand voice '{}' from {} sample(s)",
            voice.name,
            voice.sample_count
        );
        self.tables.write().await.voices.push(voice.clone());
        Ok(voice)
    }

    async fn list_brand_voices(&self) -> Result<Vec<BrandVoice>> {
        Ok(self.tables.read().await.voices.clone())
    }

    async fn delete_brand_voice(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.voices.len();
        tables.voices.retain(|v| v.id != id);
        if tables.voices.len() == before {
            return Err(ListcraftError::not_found("BrandVoice", id));
        }
        Ok(())
    }
}

/// Up to five longest distinct words across the samples.
fn longest_words(samples: &[&String]) -> Vec<String> {
    let mut words: Vec<String> = samples
        .iter()
        .flat_map(|s| s.split_whitespace())
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.len() > 4)
        .collect();
    words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    words.dedup();
    words.truncate(5);
    words
}

#[async_trait]
impl ExportCommands for InMemoryBackend {
    async fn export_pdf(&self, property_id: &str, listing_ids: &[String]) -> Result<Vec<u8>> {
        self.render_document("PDF", property_id, listing_ids).await
    }

    async fn export_docx(&self, property_id: &str, listing_ids: &[String]) -> Result<Vec<u8>> {
        self.render_document("DOCX", property_id, listing_ids).await
    }
}

impl InMemoryBackend {
    /// Plain-text rendering of the selected listings.
    async fn render_document(
        &self,
        label: &str,
        property_id: &str,
        listing_ids: &[String],
    ) -> Result<Vec<u8>> {
        let tables = self.tables.read().await;
        let selected: Vec<&GenerationRecord> = tables
            .listings
            .iter()
            .filter(|r| r.property_id == property_id)
            .filter(|r| listing_ids.is_empty() || listing_ids.contains(&r.id))
            .collect();
        if selected.is_empty() {
            return Err(ListcraftError::command("No listings selected for export"));
        }

        let mut out = format!("Listcraft {label} export\nProperty: {property_id}\n");
        for record in &selected {
            out.push_str("\n---\n");
            out.push_str(&record.content);
            out.push('\n');
        }
        let agent = tables.agent_info();
        if !agent.name.is_empty() {
            out.push_str(&format!("\n{}\n", agent.name));
        }
        Ok(out.into_bytes())
    }
}

#[async_trait]
impl LicenseCommands for InMemoryBackend {
    async fn check_license(&self) -> Result<LicenseStatus> {
        let key = self
            .tables
            .read()
            .await
            .settings
            .get(LICENSE_SETTING)
            .cloned()
            .unwrap_or_default();
        if key.is_empty() {
            return Ok(LicenseStatus::invalid("No license key provided"));
        }
        Ok(validate_key_format(&key))
    }

    async fn validate_license_key(&self, license_key: &str) -> Result<LicenseStatus> {
        let status = validate_key_format(license_key);
        if status.is_valid {
            self.tables
                .write()
                .await
                .settings
                .insert(LICENSE_SETTING.to_string(), license_key.to_string());
        }
        Ok(status)
    }
}

/// Accepts keys shaped like `XXXX-XXXX-XXXX-XXXX` (ASCII alphanumeric groups).
fn validate_key_format(key: &str) -> LicenseStatus {
    let groups: Vec<&str> = key.split('-').collect();
    let well_formed = groups.len() == 4
        && groups
            .iter()
            .all(|g| g.len() == 4 && g.chars().all(|c| c.is_ascii_alphanumeric()));

    LicenseStatus {
        is_valid: well_formed,
        license_key: key.to_string(),
        validated_at: now(),
        error: (!well_formed).then(|| "Invalid license key".to_string()),
    }
}
