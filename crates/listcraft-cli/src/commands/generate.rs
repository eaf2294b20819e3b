//! Streams a generation to stdout as it arrives.

use std::io::Write;

use anyhow::{Result, bail};
use colored::Colorize;
use listcraft_core::generation::{
    EmailParams, GenerationRequest, GenerationSession, GenerationStatus, SocialParams,
};

use super::session::Session;
use crate::GenerateKind;

pub async fn run(session: &Session, kind: GenerateKind) -> Result<()> {
    let request = build_request(session, kind).await;
    stream(session, request, true).await?;
    Ok(())
}

async fn build_request(session: &Session, kind: GenerateKind) -> GenerationRequest {
    let property_id = session.property_id.clone();
    match kind {
        GenerateKind::Listing {
            style,
            tone,
            length,
            keywords,
            brand_voice,
        } => {
            let mut params = session
                .context
                .settings
                .snapshot()
                .await
                .listing_params(property_id);
            params.style = style.unwrap_or(params.style);
            params.tone = tone.unwrap_or(params.tone);
            params.length = length.unwrap_or(params.length);
            params.seo_keywords = keywords;
            params.brand_voice_id = brand_voice;
            params.into()
        }
        GenerateKind::Social {
            platform,
            brand_voice,
        } => SocialParams {
            property_id,
            platform,
            brand_voice_id: brand_voice,
        }
        .into(),
        GenerateKind::Email { template } => EmailParams {
            property_id,
            template_type: template,
            brand_voice_id: None,
        }
        .into(),
    }
}

/// Runs `request` to completion and returns the final session.
///
/// With `echo`, text is printed as each revision lands. Ctrl-C resets the
/// surface, which makes any further events stale.
pub async fn stream(
    session: &Session,
    request: GenerationRequest,
    echo: bool,
) -> Result<GenerationSession> {
    let store = session.context.surface_for(&request).store().clone();
    let mut revisions = store.subscribe();
    let handle = session.context.generate(request).await?;
    let mut shown = String::new();

    let finished = loop {
        let current = store.session().await;
        if echo {
            show(&current.accumulated_text, &mut shown)?;
        }
        if !current.is_generating() {
            break current;
        }

        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break store.session().await;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                store.reset_generation().await;
                eprintln!("\n{}", "Generation cancelled".yellow());
                return Ok(store.session().await);
            }
        }
    };
    handle.wait().await;

    match finished.status {
        GenerationStatus::Finished => {
            if echo {
                println!();
                if let Some(usage) = finished.usage {
                    eprintln!(
                        "{}",
                        format!(
                            "{} in / {} out tokens, {} cents",
                            usage.input_tokens, usage.output_tokens, usage.cost_cents
                        )
                        .dimmed()
                    );
                }
            }
            Ok(finished)
        }
        GenerationStatus::Errored => {
            if echo && !finished.accumulated_text.is_empty() {
                println!();
            }
            bail!(
                "Generation failed: {}",
                finished.error_message.unwrap_or_default()
            )
        }
        GenerationStatus::Idle | GenerationStatus::Generating => Ok(finished),
    }
}

/// What stdout needs so the terminal shows `text`.
#[derive(Debug, PartialEq, Eq)]
enum Refresh<'a> {
    Unchanged,
    Append(&'a str),
    /// The buffer no longer extends what was printed, e.g. a `finished`
    /// event replaced it with different canonical text.
    Reprint(&'a str),
}

fn refresh<'a>(text: &'a str, shown: &str) -> Refresh<'a> {
    match text.strip_prefix(shown) {
        Some("") => Refresh::Unchanged,
        Some(fresh) => Refresh::Append(fresh),
        None => Refresh::Reprint(text),
    }
}

/// Brings stdout in line with `text`; `shown` tracks what is on screen.
fn show(text: &str, shown: &mut String) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match refresh(text, shown) {
        Refresh::Unchanged => return Ok(()),
        Refresh::Append(fresh) => stdout.write_all(fresh.as_bytes())?,
        Refresh::Reprint(full) => {
            stdout.write_all(b"\n")?;
            stdout.write_all(full.as_bytes())?;
        }
    }
    stdout.flush()?;
    shown.clear();
    shown.push_str(text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_appends_streamed_suffix() {
        assert_eq!(refresh("Beautiful ", ""), Refresh::Append("Beautiful "));
        assert_eq!(refresh("Beautiful home.", "Beautiful "), Refresh::Append("home."));
        assert_eq!(refresh("Beautiful home.", "Beautiful home."), Refresh::Unchanged);
    }

    #[test]
    fn test_refresh_reprints_replaced_text() {
        assert_eq!(
            refresh("A lovely home.", "A lovly"),
            Refresh::Reprint("A lovely home.")
        );
        assert_eq!(refresh("", "draft"), Refresh::Reprint(""));
        assert_eq!(refresh("héllo", "hé"), Refresh::Append("llo"));
    }
}
