//! End-to-end walk through every surface against the local backend.

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use listcraft_core::brand_voice::NewBrandVoice;
use listcraft_core::export::ExportFormat;
use listcraft_core::generation::{
    EmailParams, EmailTemplate, GenerationRequest, SocialParams, SocialPlatform,
};
use listcraft_core::settings::SettingKey;

use super::session::Session;
use super::{export, generate, photos};

pub async fn run(session: &Session, out: &Path) -> Result<()> {
    let context = &session.context;
    let property_id = session.property_id.clone();

    if !context.settings.has_api_key().await {
        context
            .settings
            .save_setting(SettingKey::ApiKey, "demo-key")
            .await?;
        eprintln!("{}", "No API key given, using a demo key".yellow());
    }

    heading("Brand voice");
    let voice = context
        .brand_voices
        .create_voice(NewBrandVoice {
            name: "Coastal".to_string(),
            description: Some("Breezy seaside listings".to_string()),
            sample_listings: vec![
                "Sun-drenched rooms open onto the dunes, with breezes in every season."
                    .to_string(),
                "Wake to the sound of the surf in this sun-drenched cottage by the ocean."
                    .to_string(),
            ],
        })
        .await?;
    println!("Created {} ({})", voice.name, voice.id);

    heading("Listing");
    let mut listing = context
        .settings
        .snapshot()
        .await
        .listing_params(property_id.clone());
    listing.seo_keywords = vec!["ocean views".to_string(), "renovated kitchen".to_string()];
    listing.brand_voice_id = Some(voice.id.clone());
    generate::stream(session, listing.into(), true).await?;

    heading("Social and email, streamed side by side");
    let social = GenerationRequest::Social(SocialParams {
        property_id: property_id.clone(),
        platform: SocialPlatform::Instagram,
        brand_voice_id: Some(voice.id),
    });
    let email = GenerationRequest::Email(EmailParams {
        property_id: property_id.clone(),
        template_type: EmailTemplate::OpenHouse,
        brand_voice_id: None,
    });
    let (social, email) = tokio::join!(
        generate::stream(session, social, false),
        generate::stream(session, email, false)
    );
    println!("{}\n{}\n", "Instagram:".bold(), social?.accumulated_text);
    println!("{}\n{}", "Open house email:".bold(), email?.accumulated_text);

    heading("Photos");
    let staged: Vec<PathBuf> = ["front.jpg", "kitchen.jpg", "deck.jpg"]
        .into_iter()
        .map(PathBuf::from)
        .collect();
    session.backend.stage_imports(&property_id, staged).await;
    context.photos.open(&property_id).await;
    context
        .photos
        .import_photos()
        .await
        .into_result(&context.photos.state().await)?;
    let mut ordered: Vec<String> = context
        .photos
        .photos()
        .await
        .into_iter()
        .map(|p| p.id)
        .collect();
    ordered.rotate_left(1);
    context
        .photos
        .reorder_photos(&ordered)
        .await
        .into_result(&context.photos.state().await)?;
    photos::print_photos(&property_id, &context.photos.photos().await);

    heading("History");
    let store = context.listing.store();
    store.load_generations(&property_id).await;
    if let Some(latest) = store.history().await.first() {
        store.toggle_favorite(&latest.id).await?;
    }
    for record in store.history().await {
        let star = if record.is_favorite { "*" } else { " " };
        println!(
            "{} {}  {} tokens  {}",
            star,
            record.created_at,
            record.tokens_used,
            record.style.map(|s| s.to_string()).unwrap_or_default()
        );
    }

    heading("Export");
    let path = export::export_history(session, ExportFormat::Docx, out).await?;
    println!("{} {}", "Exported".green(), path.display());

    Ok(())
}

fn heading(title: &str) {
    println!("\n{}", format!("== {title} ==").cyan().bold());
}
