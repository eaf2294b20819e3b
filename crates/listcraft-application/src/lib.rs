//! Application layer for Listcraft.
//!
//! Client-side stores and the services that keep them in sync with the
//! backend command surface. Everything here is UI-agnostic: renderers read
//! snapshots and watch revision counters.

pub mod brand_voice_cache;
pub mod context;
pub mod export_service;
pub mod generation;
pub mod license_gate;
pub mod observable;
pub mod optimistic;
pub mod photo_manager;
pub mod settings_cache;

#[cfg(test)]
mod test_support;

pub use brand_voice_cache::{BrandVoiceCache, BrandVoiceState};
pub use context::AppContext;
pub use export_service::ExportService;
pub use generation::{GenerationHandle, GenerationStore, StreamingSessionController};
pub use license_gate::LicenseGate;
pub use observable::Observable;
pub use optimistic::{OptimisticMutator, commit_then_apply};
pub use photo_manager::{MutationOutcome, PhotoManager, PhotoState};
pub use settings_cache::SettingsCache;
