use anyhow::Result;
use colored::Colorize;
use listcraft_core::brand_voice::{BrandVoice, NewBrandVoice};

use super::session::Session;
use crate::VoiceAction;

pub async fn run(session: &Session, action: VoiceAction) -> Result<()> {
    let voices = &session.context.brand_voices;
    match action {
        VoiceAction::Create {
            name,
            samples,
            description,
        } => {
            let created = voices
                .create_voice(NewBrandVoice {
                    name,
                    description,
                    sample_listings: samples,
                })
                .await?;
            println!("{} {} ({})", "Created".green(), created.name, created.id);
        }
        VoiceAction::List => voices.fetch_voices().await,
    }

    let state = voices.state().await;
    if let Some(error) = state.error {
        eprintln!("{}", error.red());
    }
    print_voices(&state.voices);
    Ok(())
}

fn print_voices(voices: &[BrandVoice]) {
    if voices.is_empty() {
        println!("No brand voices");
        return;
    }
    for voice in voices {
        let style = voice.parsed_style().unwrap_or_default();
        println!(
            "{}  {} samples  tone: {}",
            voice.name.bold(),
            voice.sample_count,
            if style.tone.is_empty() { "-" } else { style.tone.as_str() }
        );
    }
}
