//! Domain layer for Listcraft.
//!
//! Models, pure state transitions and the backend command traits shared by
//! the application and infrastructure crates.

pub mod brand_voice;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod license;
pub mod photo;
pub mod settings;

// Re-export common error type
pub use error::{ListcraftError, Result};
