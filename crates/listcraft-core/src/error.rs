//! Error types for the Listcraft client core.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the Listcraft client.
///
/// Backend commands, stores and services all report failures through this
/// type. The `Display` output is what ends up in user-visible error banners,
/// so variants carrying a backend message render that message verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ListcraftError {
    /// Entity not found error with type information
    #[error("{entity_type} not found: '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A backend command failed before or while it was dispatched.
    #[error("{0}")]
    Command(String),

    /// The backend reported an application-level generation failure.
    #[error("{0}")]
    Generation(String),

    /// Input rejected locally before reaching the backend.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Another tentative mutation is still awaiting confirmation.
    #[error("A previous {resource} change is still pending")]
    MutationPending { resource: &'static str },

    /// Generation attempted without an API key configured.
    #[error("Add your API key in Settings first.")]
    MissingApiKey,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ListcraftError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Command error
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command(message.into())
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from the backend command layer
    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command(_))
    }

    /// Check if this is a pending-mutation rejection
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::MutationPending { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ListcraftError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ListcraftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ListcraftError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ListcraftError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error, used by backend adapters that report
/// failures as anyhow chains.
impl From<anyhow::Error> for ListcraftError {
    fn from(err: anyhow::Error) -> Self {
        Self::Command(err.to_string())
    }
}

/// A type alias for `Result<T, ListcraftError>`.
pub type Result<T> = std::result::Result<T, ListcraftError>;
