//! License activation state.

use serde::{Deserialize, Serialize};

/// Result of a license check as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseStatus {
    pub is_valid: bool,
    #[serde(default)]
    pub license_key: String,
    #[serde(default)]
    pub validated_at: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl LicenseStatus {
    /// An invalid status carrying `message`.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
            ..Self::default()
        }
    }
}
