//! Deterministic template copy for the local backend.
//!
//! Produces plausible marketing text from the request options alone, so the
//! streaming pipeline can be exercised end to end without an AI provider.

use listcraft_core::generation::{
    EmailTemplate, ListingLength, ListingParams, ListingStyle, ListingTone, SocialPlatform,
};
use listcraft_core::settings::AgentInfo;

// Rough words-per-token ratio used for estimates.
const TOKENS_PER_WORD: f32 = 1.3;

pub(crate) fn estimate_tokens(text: &str) -> u32 {
    (text.split_whitespace().count() as f32 * TOKENS_PER_WORD).ceil() as u32
}

/// Cost in cents for the given token counts.
pub(crate) fn cost_cents(input_tokens: u32, output_tokens: u32) -> u32 {
    // 3 USD per million input tokens, 15 USD per million output tokens.
    let micro_dollars = input_tokens as u64 * 3 + output_tokens as u64 * 15;
    micro_dollars.div_ceil(10_000) as u32
}

pub(crate) fn listing(
    params: &ListingParams,
    voice_name: Option<&str>,
    agent: &AgentInfo,
) -> String {
    let opening = match params.style {
        ListingStyle::Luxury => "Discover an exceptional residence where refined living meets timeless design.",
        ListingStyle::Family => "Welcome home to a place built for everyday moments and lasting memories.",
        ListingStyle::Investment => "A compelling opportunity with strong fundamentals and room to grow.",
        ListingStyle::FirstTime => "Your first chapter of homeownership starts right here.",
    };
    let voice = match params.tone {
        ListingTone::Professional => "Every detail has been thoughtfully considered.",
        ListingTone::Warm => "You will feel it the moment you step through the door.",
        ListingTone::Exciting => "This one will not last long!",
    };

    let mut paragraphs = vec![format!("{opening} {voice}")];

    if !params.seo_keywords.is_empty() {
        paragraphs.push(format!(
            "Highlights include {}.",
            params.seo_keywords.join(", ")
        ));
    }

    let extra = match params.length {
        ListingLength::Short => 0,
        ListingLength::Medium => 1,
        ListingLength::Long => 3,
    };
    let details = [
        "Light pours through generous windows into open living spaces.",
        "The kitchen invites gatherings large and small.",
        "Outdoor areas extend the living space through every season.",
    ];
    paragraphs.extend(details.iter().take(extra).map(|d| d.to_string()));

    if let Some(name) = voice_name {
        paragraphs.push(format!("Written in the {name} voice."));
    }
    if let Some(signature) = signature(agent) {
        paragraphs.push(signature);
    }

    paragraphs.join("\n\n")
}

pub(crate) fn social(platform: SocialPlatform, voice_name: Option<&str>) -> String {
    let mut post = match platform {
        SocialPlatform::Instagram => {
            "Just listed! Sunlit rooms, a dream kitchen and space to breathe. #JustListed #NewHome #RealEstate".to_string()
        }
        SocialPlatform::Facebook => {
            "New on the market: a home that checks every box. Message us to book a private showing this week.".to_string()
        }
        SocialPlatform::Linkedin => {
            "Pleased to present a new listing that pairs location with long-term value. Reach out to discuss the details.".to_string()
        }
    };
    if let Some(name) = voice_name {
        post.push_str(&format!(" ({name})"));
    }
    post.chars().take(platform.max_chars()).collect()
}

pub(crate) fn email(template: EmailTemplate, agent: &AgentInfo) -> String {
    let (subject, body) = match template {
        EmailTemplate::Buyer => (
            "A home you will want to see",
            "I came across a property that matches what you have been looking for. I would love to walk you through it.",
        ),
        EmailTemplate::Seller => (
            "Your listing is live",
            "Your home is now listed and already drawing interest. Here is what to expect over the next two weeks.",
        ),
        EmailTemplate::OpenHouse => (
            "You are invited: open house this weekend",
            "Join us this weekend for an open house. Stop by, look around and ask anything.",
        ),
    };

    let mut text = format!("Subject: {subject}\n\n{body}");
    if let Some(signature) = signature(agent) {
        text.push_str("\n\n");
        text.push_str(&signature);
    }
    text
}

fn signature(agent: &AgentInfo) -> Option<String> {
    if agent.name.is_empty() {
        return None;
    }
    let contact: Vec<&str> = [&agent.brokerage_name, &agent.phone, &agent.email]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if contact.is_empty() {
        Some(agent.name.clone())
    } else {
        Some(format!("{} | {}", agent.name, contact.join(" | ")))
    }
}
