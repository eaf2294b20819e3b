//! Generation domain models.
//!
//! Value types describing what can be generated and the persisted history
//! records the backend returns.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Kind of artifact a generation record holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GenerationType {
    Listing,
    SocialInstagram,
    SocialFacebook,
    SocialLinkedin,
    EmailBuyer,
    EmailSeller,
    EmailOpenHouse,
}

/// Writing style for a listing description.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ListingStyle {
    #[default]
    Luxury,
    Family,
    Investment,
    FirstTime,
}

/// Voice the listing is written in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ListingTone {
    Professional,
    #[default]
    Warm,
    Exciting,
}

/// Target length of a listing description.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ListingLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl ListingLength {
    /// Word-count band shown next to the selector.
    pub fn word_range(&self) -> (u32, u32) {
        match self {
            Self::Short => (100, 150),
            Self::Medium => (200, 300),
            Self::Long => (400, 500),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SocialPlatform {
    Instagram,
    Facebook,
    Linkedin,
}

impl SocialPlatform {
    /// Platform post length limit in characters.
    pub fn max_chars(&self) -> usize {
        match self {
            Self::Instagram => 2200,
            Self::Facebook => 63206,
            Self::Linkedin => 3000,
        }
    }

    pub fn generation_type(&self) -> GenerationType {
        match self {
            Self::Instagram => GenerationType::SocialInstagram,
            Self::Facebook => GenerationType::SocialFacebook,
            Self::Linkedin => GenerationType::SocialLinkedin,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmailTemplate {
    Buyer,
    Seller,
    OpenHouse,
}

impl EmailTemplate {
    pub fn generation_type(&self) -> GenerationType {
        match self {
            Self::Buyer => GenerationType::EmailBuyer,
            Self::Seller => GenerationType::EmailSeller,
            Self::OpenHouse => GenerationType::EmailOpenHouse,
        }
    }
}

/// A persisted AI-generated text artifact tied to a property.
///
/// Owned by backend storage. The client keeps a read-through copy; the only
/// field it ever changes locally is `is_favorite`, and only after the backend
/// confirmed the toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub id: String,
    pub property_id: String,
    pub content: String,
    pub generation_type: GenerationType,
    #[serde(default)]
    pub style: Option<ListingStyle>,
    #[serde(default)]
    pub tone: Option<ListingTone>,
    #[serde(default)]
    pub length: Option<ListingLength>,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    #[serde(default)]
    pub brand_voice_id: Option<String>,
    pub tokens_used: u32,
    pub generation_cost_cents: u32,
    pub is_favorite: bool,
    /// Timestamp when the record was created (ISO 8601 format)
    pub created_at: String,
}

impl GenerationRecord {
    pub fn is_listing(&self) -> bool {
        self.generation_type == GenerationType::Listing
    }
}

/// Keeps only listing-type records, preserving backend order.
pub fn listing_history(records: Vec<GenerationRecord>) -> Vec<GenerationRecord> {
    records.into_iter().filter(GenerationRecord::is_listing).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(id: &str, generation_type: GenerationType) -> GenerationRecord {
        GenerationRecord {
            id: id.to_string(),
            property_id: "prop-1".to_string(),
            content: format!("content {id}"),
            generation_type,
            style: None,
            tone: None,
            length: None,
            seo_keywords: Vec::new(),
            brand_voice_id: None,
            tokens_used: 0,
            generation_cost_cents: 0,
            is_favorite: false,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_listing_history_filters_and_keeps_order() {
        let records = vec![
            record("a", GenerationType::Listing),
            record("b", GenerationType::SocialInstagram),
            record("c", GenerationType::Listing),
            record("d", GenerationType::EmailOpenHouse),
        ];

        let ids: Vec<_> = listing_history(records).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_record_wire_shape_is_camel_case() {
        let json = serde_json::json!({
            "id": "l-1",
            "propertyId": "prop-1",
            "content": "Beautiful home.",
            "generationType": "social_linkedin",
            "style": null,
            "tone": "warm",
            "length": "short",
            "seoKeywords": ["pool"],
            "brandVoiceId": null,
            "tokensUsed": 120,
            "generationCostCents": 3,
            "isFavorite": true,
            "createdAt": "2024-01-01T00:00:00Z"
        });

        let parsed: GenerationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.generation_type, GenerationType::SocialLinkedin);
        assert_eq!(parsed.tone, Some(ListingTone::Warm));
        assert!(parsed.is_favorite);
    }

    #[test]
    fn test_enum_string_forms() {
        assert_eq!(ListingStyle::FirstTime.as_ref(), "first_time");
        assert_eq!(
            ListingStyle::from_str("investment").unwrap(),
            ListingStyle::Investment
        );
        assert_eq!(EmailTemplate::OpenHouse.to_string(), "open_house");
        assert!(ListingTone::from_str("sarcastic").is_err());
    }
}
