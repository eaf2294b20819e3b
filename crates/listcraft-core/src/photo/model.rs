use serde::{Deserialize, Serialize};

/// Maximum number of photos the backend accepts per property.
pub const MAX_PHOTOS: usize = 20;

/// A property photo as stored by the backend.
///
/// `sort_order` defines display order and is contiguous (`0..n-1`) per
/// property after every successful reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: String,
    pub property_id: String,
    pub filename: String,
    #[serde(default)]
    pub original_path: String,
    pub thumbnail_path: String,
    pub sort_order: u32,
    #[serde(default)]
    pub caption: Option<String>,
    /// Timestamp when the photo was imported (ISO 8601 format)
    pub created_at: String,
}
