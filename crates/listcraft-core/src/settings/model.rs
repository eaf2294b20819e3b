//! Settings domain models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::generation::{ListingLength, ListingParams, ListingStyle, ListingTone};

/// Named settings the client reads at startup.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SettingKey {
    ApiKey,
    AgentName,
    AgentPhone,
    AgentEmail,
    BrokerageName,
    DefaultStyle,
    DefaultTone,
    DefaultLength,
}

impl SettingKey {
    pub fn all() -> impl Iterator<Item = SettingKey> {
        SettingKey::iter()
    }

    /// Whether the value must never be written to logs.
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::ApiKey)
    }
}

/// Agent contact details appended to generated copy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub brokerage_name: String,
}

/// Key to value mapping of every known setting.
///
/// Missing keys read as the empty string. Each key is independent; there is
/// no cross-field consistency.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    values: BTreeMap<SettingKey, String>,
}

impl SettingsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: SettingKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, key: SettingKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn has_api_key(&self) -> bool {
        !self.get(SettingKey::ApiKey).trim().is_empty()
    }

    pub fn agent_info(&self) -> AgentInfo {
        AgentInfo {
            name: self.get(SettingKey::AgentName).to_string(),
            phone: self.get(SettingKey::AgentPhone).to_string(),
            email: self.get(SettingKey::AgentEmail).to_string(),
            brokerage_name: self.get(SettingKey::BrokerageName).to_string(),
        }
    }

    pub fn default_style(&self) -> ListingStyle {
        parse_or_default(self.get(SettingKey::DefaultStyle))
    }

    pub fn default_tone(&self) -> ListingTone {
        parse_or_default(self.get(SettingKey::DefaultTone))
    }

    pub fn default_length(&self) -> ListingLength {
        parse_or_default(self.get(SettingKey::DefaultLength))
    }

    /// Listing parameters prefilled from the saved generation defaults.
    pub fn listing_params(&self, property_id: impl Into<String>) -> ListingParams {
        ListingParams {
            property_id: property_id.into(),
            style: self.default_style(),
            tone: self.default_tone(),
            length: self.default_length(),
            seo_keywords: Vec::new(),
            brand_voice_id: None,
        }
    }
}

impl FromIterator<(SettingKey, String)> for SettingsSnapshot {
    fn from_iter<I: IntoIterator<Item = (SettingKey, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn parse_or_default<T: FromStr + Default>(raw: &str) -> T {
    raw.trim().parse().unwrap_or_default()
}
