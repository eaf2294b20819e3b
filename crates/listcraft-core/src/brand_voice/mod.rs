//! Brand voice domain module.
//!
//! A brand voice is a named style profile the backend derives from sample
//! listings. Generation requests reference it by id.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandVoice {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// JSON document describing the extracted style (see [`ExtractedStyle`]).
    pub extracted_style: String,
    /// JSON array of the sample listings the voice was built from.
    pub source_listings: String,
    pub sample_count: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl BrandVoice {
    /// Parses `extracted_style`. Returns `None` when the backend stored
    /// something that does not match the expected shape.
    pub fn parsed_style(&self) -> Option<ExtractedStyle> {
        serde_json::from_str(&self.extracted_style).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedStyle {
    pub tone: String,
    #[serde(default)]
    pub vocabulary: Vec<String>,
    #[serde(default)]
    pub sentence_patterns: String,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub signature_phrases: Vec<String>,
    #[serde(default)]
    pub avoids: Vec<String>,
    #[serde(default)]
    pub formatting: String,
}

/// Input for creating a brand voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBrandVoice {
    pub name: String,
    pub description: Option<String>,
    pub sample_listings: Vec<String>,
}
