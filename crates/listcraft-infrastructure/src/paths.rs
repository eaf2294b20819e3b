//! Path management for Listcraft configuration and logs.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/listcraft/         # Config directory (platform default via `dirs`)
//! ├── config.toml              # Client configuration
//! └── logs/                    # Daily-rotated client logs
//!     └── listcraft.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

use listcraft_core::error::{ListcraftError, Result};

const APP_DIR: &str = "listcraft";

/// Resolves every on-disk location the client uses.
///
/// `ListcraftPaths::new(None)` uses the platform config directory; tests pass
/// an explicit base to stay inside a temp directory.
#[derive(Debug, Clone)]
pub struct ListcraftPaths {
    base_override: Option<PathBuf>,
}

impl ListcraftPaths {
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    /// Root configuration directory (e.g. `~/.config/listcraft/`).
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base_override {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| ListcraftError::config("Cannot find config directory")),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("logs"))
    }
}

impl Default for ListcraftPaths {
    fn default() -> Self {
        Self::new(None)
    }
}
