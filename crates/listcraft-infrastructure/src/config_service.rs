//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml` in the Listcraft config
//! directory and caches it.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use listcraft_core::config::ClientConfig;
use listcraft_core::error::Result;

use crate::paths::ListcraftPaths;
use crate::storage::AtomicTomlFile;

/// Lazily loaded, cached client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: ListcraftPaths,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Nothing is read until the first [`Self::get_config`].
    pub fn new(paths: ListcraftPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, reading the file on first use.
    ///
    /// A missing, unreadable or malformed file yields the defaults; the
    /// problem is logged and not cached, so fixing the file takes effect on
    /// the next call.
    pub fn get_config(&self) -> ClientConfig {
        if let Some(cached) = self.read_cache() {
            return cached;
        }

        match self.load_config() {
            Ok(loaded) => {
                self.write_cache(Some(loaded.clone()));
                loaded
            }
            Err(e) => {
                tracing::warn!("[ConfigService] Using default config: {}", e);
                ClientConfig::default()
            }
        }
    }

    /// Forces the next [`Self::get_config`] to read the file again.
    pub fn invalidate_cache(&self) {
        self.write_cache(None);
    }

    /// Writes `config` atomically and refreshes the cache.
    ///
    /// Whatever the file held before is discarded unread, including a
    /// malformed file.
    pub fn save_config(&self, config: &ClientConfig) -> Result<()> {
        let file = self.file()?;
        file.replace(config)?;
        tracing::info!("[ConfigService] Saved config to {}", file.path().display());
        self.write_cache(Some(config.clone()));
        Ok(())
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        self.paths.config_file()
    }

    fn load_config(&self) -> Result<ClientConfig> {
        let file = self.file()?;
        let loaded = file.load()?;
        if loaded.is_none() {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                file.path().display()
            );
        }
        Ok(loaded.unwrap_or_default())
    }

    fn file(&self) -> Result<AtomicTomlFile<ClientConfig>> {
        Ok(AtomicTomlFile::new(self.paths.config_file()?))
    }

    fn read_cache(&self) -> Option<ClientConfig> {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn write_cache(&self, value: Option<ClientConfig>) {
        match self.config.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(ListcraftPaths::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::new(ListcraftPaths::new(Some(dir.path().to_path_buf())))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();

        assert_eq!(service(&dir).get_config(), ClientConfig::default());
    }

    #[test]
    fn test_reads_partial_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "log_level = \"debug\"\n\n[backend]\nchunk_chars = 4\n",
        )
        .unwrap();

        let config = service(&dir).get_config();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.backend.chunk_chars, 4);
        assert_eq!(config.backend.stream_delay_ms, 25);
    }

    #[test]
    fn test_cache_until_invalidated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_level = \"warn\"\n").unwrap();
        let service = service(&dir);
        assert_eq!(service.get_config().log_level, "warn");

        fs::write(&path, "log_level = \"trace\"\n").unwrap();
        assert_eq!(service.get_config().log_level, "warn");

        service.invalidate_cache();
        assert_eq!(service.get_config().log_level, "trace");
    }

    #[test]
    fn test_malformed_file_falls_back_without_caching() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_level = ").unwrap();
        let service = service(&dir);

        assert_eq!(service.get_config(), ClientConfig::default());

        fs::write(&path, "log_to_file = true\n").unwrap();
        assert!(service.get_config().log_to_file);
    }

    #[test]
    fn test_save_repairs_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_level = ").unwrap();
        let service = service(&dir);

        service.save_config(&service.get_config()).unwrap();
        service.invalidate_cache();

        assert_eq!(service.get_config(), ClientConfig::default());
        assert!(fs::read_to_string(&path).unwrap().contains("log_level = \"info\""));
    }

    #[test]
    fn test_save_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let mut config = service.get_config();
        config.log_to_file = true;
        config.backend.stream_delay_ms = 0;

        service.save_config(&config).unwrap();
        service.invalidate_cache();

        assert_eq!(service.get_config(), config);
    }
}
