use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use listcraft_core::export::ExportFormat;
use listcraft_core::generation::GenerationRequest;

use super::generate;
use super::session::Session;

/// Generates a listing with the saved defaults, then exports the history.
pub async fn run(session: &Session, format: ExportFormat, destination: &Path) -> Result<()> {
    let params = session
        .context
        .settings
        .snapshot()
        .await
        .listing_params(session.property_id.clone());
    generate::stream(session, GenerationRequest::Listing(params), false).await?;

    let path = export_history(session, format, destination).await?;
    println!("{} {}", "Exported".green(), path.display());
    Ok(())
}

/// Exports every listing in the loaded history of the session's property.
pub async fn export_history(
    session: &Session,
    format: ExportFormat,
    destination: &Path,
) -> Result<PathBuf> {
    let store = session.context.listing.store();
    store.load_generations(&session.property_id).await;
    let listing_ids: Vec<String> = store.history().await.into_iter().map(|r| r.id).collect();

    Ok(session
        .context
        .export
        .export(format, &session.property_id, &listing_ids, destination)
        .await?)
}
