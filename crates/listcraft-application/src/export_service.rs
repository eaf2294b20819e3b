use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use listcraft_core::commands::ExportCommands;
use listcraft_core::error::Result;
use listcraft_core::export::ExportFormat;

/// Renders listings through the backend and writes the document to disk.
pub struct ExportService {
    commands: Arc<dyn ExportCommands>,
    is_exporting: AtomicBool,
}

/// Clears the exporting flag when the export ends, however it ends.
struct ExportingGuard<'a>(&'a AtomicBool);

impl Drop for ExportingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ExportService {
    pub fn new(commands: Arc<dyn ExportCommands>) -> Self {
        Self {
            commands,
            is_exporting: AtomicBool::new(false),
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.is_exporting.load(Ordering::SeqCst)
    }

    /// Exports `listing_ids` of `property_id` as `format` into `destination`.
    ///
    /// When `destination` is a directory, the format's default file name is
    /// used inside it. Returns the path written.
    pub async fn export(
        &self,
        format: ExportFormat,
        property_id: &str,
        listing_ids: &[String],
        destination: &Path,
    ) -> Result<PathBuf> {
        self.is_exporting.store(true, Ordering::SeqCst);
        let _guard = ExportingGuard(&self.is_exporting);

        let bytes = match format {
            ExportFormat::Pdf => self.commands.export_pdf(property_id, listing_ids).await,
            ExportFormat::Docx => self.commands.export_docx(property_id, listing_ids).await,
        }
        .inspect_err(|e| {
            tracing::warn!("[ExportService] {} export failed: {}", format.label(), e)
        })?;

        let path = if tokio::fs::metadata(destination)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            destination.join(format.default_file_name())
        } else {
            destination.to_path_buf()
        };

        tokio::fs::write(&path, &bytes).await?;
        tracing::info!(
            "[ExportService] Saved {} ({} bytes) to {}",
            format.label(),
            bytes.len(),
            path.display()
        );
        Ok(path)
    }
}
