//! Application composition root.

use std::sync::Arc;

use listcraft_core::commands::{Backend, GenerationCommands, ListingCommands};
use listcraft_core::error::{ListcraftError, Result};
use listcraft_core::generation::GenerationRequest;
use listcraft_core::license::LicenseStatus;
use tokio_util::sync::CancellationToken;

use crate::brand_voice_cache::BrandVoiceCache;
use crate::export_service::ExportService;
use crate::generation::{GenerationHandle, GenerationStore, StreamingSessionController};
use crate::license_gate::LicenseGate;
use crate::photo_manager::PhotoManager;
use crate::settings_cache::SettingsCache;

/// Every client-side store and service, wired to one backend.
///
/// Listing, social and email generation each get their own store, so a
/// social post streaming in never disturbs the listing shown next to it.
pub struct AppContext {
    pub listing: StreamingSessionController,
    pub social: StreamingSessionController,
    pub email: StreamingSessionController,
    pub photos: PhotoManager,
    pub settings: SettingsCache,
    pub brand_voices: BrandVoiceCache,
    pub export: ExportService,
    pub license: LicenseGate,
    shutdown: CancellationToken,
}

impl AppContext {
    pub fn new<B: Backend + 'static>(backend: Arc<B>) -> Self {
        let shutdown = CancellationToken::new();
        let listings: Arc<dyn ListingCommands> = backend.clone();
        let generation: Arc<dyn GenerationCommands> = backend.clone();

        let surface = || {
            StreamingSessionController::new(
                Arc::new(GenerationStore::new(listings.clone())),
                generation.clone(),
                shutdown.clone(),
            )
        };

        let (listing, social, email) = (surface(), surface(), surface());

        Self {
            listing,
            social,
            email,
            photos: PhotoManager::new(backend.clone()),
            settings: SettingsCache::new(backend.clone()),
            brand_voices: BrandVoiceCache::new(backend.clone()),
            export: ExportService::new(backend.clone()),
            license: LicenseGate::new(backend),
            shutdown,
        }
    }

    /// Startup work: license check and settings load, run concurrently.
    pub async fn bootstrap(&self) -> LicenseStatus {
        let (status, ()) = tokio::join!(self.license.check(), self.settings.load_settings());
        tracing::info!(
            "[AppContext] Bootstrapped (licensed: {}, api key: {})",
            status.is_valid,
            self.settings.has_api_key().await
        );
        status
    }

    /// Controller serving the surface `request` belongs to.
    pub fn surface_for(&self, request: &GenerationRequest) -> &StreamingSessionController {
        match request {
            GenerationRequest::Listing(_) => &self.listing,
            GenerationRequest::Social(_) => &self.social,
            GenerationRequest::Email(_) => &self.email,
        }
    }

    /// Starts a generation on the matching surface.
    ///
    /// # Errors
    ///
    /// `MissingApiKey` when no API key is configured; nothing is sent then.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationHandle> {
        if !self.settings.has_api_key().await {
            tracing::warn!(
                "[AppContext] Refusing {} generation without an API key",
                request.kind()
            );
            return Err(ListcraftError::MissingApiKey);
        }
        Ok(self.surface_for(&request).generate(request).await)
    }

    /// Stops every in-flight session drain.
    pub fn shutdown(&self) {
        tracing::info!("[AppContext] Shutting down");
        self.shutdown.cancel();
    }
}
