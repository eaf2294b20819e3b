//! Backend command interface.
//!
//! The client core never touches storage, the AI provider, document
//! rendering or license servers directly. Everything goes through these
//! traits, which a desktop shell implements over its IPC layer (and which the
//! infrastructure crate implements in memory).
//!
//! All methods return [`crate::error::Result`]; a returned error always means
//! the command itself failed (transport or backend), never an application
//! event delivered through an [`EventSink`].

use async_trait::async_trait;

use crate::brand_voice::{BrandVoice, NewBrandVoice};
use crate::error::Result;
use crate::generation::{
    EmailParams, EventSink, GenerationRecord, GenerationRequest, ListingParams, SocialParams,
};
use crate::license::LicenseStatus;
use crate::photo::PhotoRecord;

/// Streaming generation commands.
///
/// Each call resolves once the backend has accepted and dispatched the
/// request. Progress and completion are reported exclusively through `sink`.
#[async_trait]
pub trait GenerationCommands: Send + Sync {
    async fn generate_listing(&self, params: ListingParams, sink: EventSink) -> Result<()>;

    async fn generate_social(&self, params: SocialParams, sink: EventSink) -> Result<()>;

    async fn generate_email(&self, params: EmailParams, sink: EventSink) -> Result<()>;

    /// Dispatches to the command matching the request kind.
    async fn generate(&self, request: GenerationRequest, sink: EventSink) -> Result<()> {
        match request {
            GenerationRequest::Listing(params) => self.generate_listing(params, sink).await,
            GenerationRequest::Social(params) => self.generate_social(params, sink).await,
            GenerationRequest::Email(params) => self.generate_email(params, sink).await,
        }
    }
}

/// Generation history commands.
#[async_trait]
pub trait ListingCommands: Send + Sync {
    /// All records for a property, of every generation type.
    async fn list_listings(&self, property_id: &str) -> Result<Vec<GenerationRecord>>;

    async fn toggle_listing_favorite(&self, id: &str) -> Result<()>;

    async fn delete_listing(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait PhotoCommands: Send + Sync {
    async fn list_photos(&self, property_id: &str) -> Result<Vec<PhotoRecord>>;

    /// Lets the user pick files and imports them. Returns only the new photos;
    /// an empty list means the user cancelled.
    async fn import_photos(&self, property_id: &str) -> Result<Vec<PhotoRecord>>;

    async fn delete_photo(&self, id: &str) -> Result<()>;

    async fn reorder_photos(&self, property_id: &str, ordered_ids: &[String]) -> Result<()>;
}

#[async_trait]
pub trait SettingsCommands: Send + Sync {
    /// Fails when the key has never been set.
    async fn get_setting(&self, key: &str) -> Result<String>;

    async fn set_setting(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
pub trait BrandVoiceCommands: Send + Sync {
    async fn create_brand_voice(&self, input: NewBrandVoice) -> Result<BrandVoice>;

    async fn list_brand_voices(&self) -> Result<Vec<BrandVoice>>;

    async fn delete_brand_voice(&self, id: &str) -> Result<()>;
}

/// Document export commands. Both return the rendered file bytes.
#[async_trait]
pub trait ExportCommands: Send + Sync {
    async fn export_pdf(&self, property_id: &str, listing_ids: &[String]) -> Result<Vec<u8>>;

    async fn export_docx(&self, property_id: &str, listing_ids: &[String]) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait LicenseCommands: Send + Sync {
    /// Checks the stored license (possibly from a cached validation).
    async fn check_license(&self) -> Result<LicenseStatus>;

    /// Validates and, when valid, stores `license_key`.
    async fn validate_license_key(&self, license_key: &str) -> Result<LicenseStatus>;
}

/// The complete command surface a desktop shell provides.
pub trait Backend:
    GenerationCommands
    + ListingCommands
    + PhotoCommands
    + SettingsCommands
    + BrandVoiceCommands
    + ExportCommands
    + LicenseCommands
{
}

impl<T> Backend for T where
    T: GenerationCommands
        + ListingCommands
        + PhotoCommands
        + SettingsCommands
        + BrandVoiceCommands
        + ExportCommands
        + LicenseCommands
{
}
