//! Generation request parameters.

use serde::{Deserialize, Serialize};

use super::model::{EmailTemplate, ListingLength, ListingStyle, ListingTone, SocialPlatform};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub property_id: String,
    pub style: ListingStyle,
    pub tone: ListingTone,
    pub length: ListingLength,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    #[serde(default)]
    pub brand_voice_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialParams {
    pub property_id: String,
    pub platform: SocialPlatform,
    #[serde(default)]
    pub brand_voice_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailParams {
    pub property_id: String,
    pub template_type: EmailTemplate,
    #[serde(default)]
    pub brand_voice_id: Option<String>,
}

/// One outbound generation request, for any of the three surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    Listing(ListingParams),
    Social(SocialParams),
    Email(EmailParams),
}

impl GenerationRequest {
    pub fn property_id(&self) -> &str {
        match self {
            Self::Listing(p) => &p.property_id,
            Self::Social(p) => &p.property_id,
            Self::Email(p) => &p.property_id,
        }
    }

    pub fn brand_voice_id(&self) -> Option<&str> {
        match self {
            Self::Listing(p) => p.brand_voice_id.as_deref(),
            Self::Social(p) => p.brand_voice_id.as_deref(),
            Self::Email(p) => p.brand_voice_id.as_deref(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Listing(_) => "listing",
            Self::Social(_) => "social",
            Self::Email(_) => "email",
        }
    }

    /// Listing generations land in the listing history view.
    pub fn feeds_listing_history(&self) -> bool {
        matches!(self, Self::Listing(_))
    }
}

impl From<ListingParams> for GenerationRequest {
    fn from(params: ListingParams) -> Self {
        Self::Listing(params)
    }
}

impl From<SocialParams> for GenerationRequest {
    fn from(params: SocialParams) -> Self {
        Self::Social(params)
    }
}

impl From<EmailParams> for GenerationRequest {
    fn from(params: EmailParams) -> Self {
        Self::Email(params)
    }
}
