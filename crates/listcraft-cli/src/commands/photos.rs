use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use listcraft_core::photo::PhotoRecord;

use super::session::Session;

pub async fn run(session: &Session, paths: Vec<PathBuf>, reverse: bool) -> Result<()> {
    let photos = &session.context.photos;
    photos.open(&session.property_id).await;

    if !paths.is_empty() {
        session
            .backend
            .stage_imports(&session.property_id, paths)
            .await;
        photos
            .import_photos()
            .await
            .into_result(&photos.state().await)?;
    }

    if reverse {
        let ordered: Vec<String> = photos
            .photos()
            .await
            .iter()
            .rev()
            .map(|p| p.id.clone())
            .collect();
        photos
            .reorder_photos(&ordered)
            .await
            .into_result(&photos.state().await)?;
    }

    print_photos(&session.property_id, &photos.photos().await);
    Ok(())
}

pub fn print_photos(property_id: &str, photos: &[PhotoRecord]) {
    println!("{} ({} photos)", property_id.bold(), photos.len());
    for photo in photos {
        println!("  {:>2}. {}", photo.sort_order + 1, photo.filename);
    }
}
