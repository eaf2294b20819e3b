use serde::{Deserialize, Serialize};

/// Client configuration read from `config.toml`.
///
/// Every field has a default so a partial (or missing) file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG` when set.
    pub log_level: String,
    /// Also write a daily-rotated log file under the logs directory.
    pub log_to_file: bool,
    pub backend: LocalBackendConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
            backend: LocalBackendConfig::default(),
        }
    }
}

/// Tuning for the bundled local backend.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LocalBackendConfig {
    /// Pause between streamed chunks.
    pub stream_delay_ms: u64,
    /// Characters per streamed delta.
    pub chunk_chars: usize,
}

impl Default for LocalBackendConfig {
    fn default() -> Self {
        Self {
            stream_delay_ms: 25,
            chunk_chars: 12,
        }
    }
}
