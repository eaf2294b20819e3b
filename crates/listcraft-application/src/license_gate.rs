use std::sync::Arc;

use listcraft_core::commands::LicenseCommands;
use listcraft_core::error::{ListcraftError, Result};
use listcraft_core::license::LicenseStatus;
use tokio::sync::RwLock;

/// Startup license check and key activation.
pub struct LicenseGate {
    commands: Arc<dyn LicenseCommands>,
    status: RwLock<Option<LicenseStatus>>,
}

impl LicenseGate {
    pub fn new(commands: Arc<dyn LicenseCommands>) -> Self {
        Self {
            commands,
            status: RwLock::new(None),
        }
    }

    /// Last known status, `None` before the first check.
    pub async fn status(&self) -> Option<LicenseStatus> {
        self.status.read().await.clone()
    }

    pub async fn is_licensed(&self) -> bool {
        self.status
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.is_valid)
    }

    /// Asks the backend for the stored license. Never fails: an unreachable
    /// backend reads as an invalid license carrying the error.
    pub async fn check(&self) -> LicenseStatus {
        let status = match self.commands.check_license().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("[LicenseGate] License check failed: {}", e);
                LicenseStatus::invalid(e.to_string())
            }
        };
        tracing::info!("[LicenseGate] License valid: {}", status.is_valid);
        *self.status.write().await = Some(status.clone());
        status
    }

    /// Validates and stores `license_key`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank key (no backend call), otherwise the
    /// backend error.
    pub async fn activate(&self, license_key: &str) -> Result<LicenseStatus> {
        let key = license_key.trim();
        if key.is_empty() {
            return Err(ListcraftError::invalid_input("Please enter a license key"));
        }

        let status = self.commands.validate_license_key(key).await?;
        if !status.is_valid {
            tracing::warn!(
                "[LicenseGate] License key rejected: {}",
                status.error.as_deref().unwrap_or("unknown reason")
            );
        }
        *self.status.write().await = Some(status.clone());
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBackend;

    #[tokio::test]
    async fn test_check_failure_reads_as_invalid() {
        let backend = Arc::new(MockBackend::new());
        backend.fail("check_license", "license server unreachable").await;
        let gate = LicenseGate::new(backend.clone());

        let status = gate.check().await;

        assert!(!status.is_valid);
        assert_eq!(status.error.as_deref(), Some("license server unreachable"));
        assert!(!gate.is_licensed().await);
    }

    #[tokio::test]
    async fn test_blank_key_rejected_locally() {
        let backend = Arc::new(MockBackend::new());
        let gate = LicenseGate::new(backend.clone());

        let result = gate.activate("   ").await;

        assert_eq!(
            result,
            Err(ListcraftError::invalid_input("Please enter a license key"))
        );
        assert_eq!(backend.calls_to("validate_license_key").await, 0);
    }

    #[tokio::test]
    async fn test_activate_trims_key() {
        let backend = Arc::new(MockBackend::new());
        let gate = LicenseGate::new(backend.clone());

        let status = gate.activate("  LC-1234-ABCD \n").await.unwrap();

        assert!(status.is_valid);
        assert_eq!(status.license_key, "LC-1234-ABCD");
        assert!(gate.is_licensed().await);
    }
}
