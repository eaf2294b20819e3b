//! Photo ordering rules shared by the client cache and backends.

use std::collections::HashSet;

use super::model::PhotoRecord;
use crate::error::{ListcraftError, Result};

/// Rebuilds `photos` in the order given by `ordered_ids`.
///
/// `ordered_ids` must be a permutation of the ids in `photos`. Each photo's
/// `sort_order` is re-derived from its position, so the result is always
/// numbered `0..n-1` with no gaps.
///
/// # Errors
///
/// Returns `InvalidInput` when an id is unknown, repeated, or missing.
pub fn reorder(photos: &[PhotoRecord], ordered_ids: &[String]) -> Result<Vec<PhotoRecord>> {
    ensure_permutation(photos, ordered_ids)?;

    Ok(ordered_ids
        .iter()
        .filter_map(|id| photos.iter().find(|p| &p.id == id))
        .enumerate()
        .map(|(index, photo)| PhotoRecord {
            sort_order: index as u32,
            ..photo.clone()
        })
        .collect())
}

fn ensure_permutation(photos: &[PhotoRecord], ordered_ids: &[String]) -> Result<()> {
    let known: HashSet<&str> = photos.iter().map(|p| p.id.as_str()).collect();
    let mut seen = HashSet::with_capacity(ordered_ids.len());

    for id in ordered_ids {
        if !known.contains(id.as_str()) {
            return Err(ListcraftError::invalid_input(format!(
                "photo {id} is not part of this property"
            )));
        }
        if !seen.insert(id.as_str()) {
            return Err(ListcraftError::invalid_input(format!(
                "photo {id} appears more than once"
            )));
        }
    }

    if seen.len() != known.len() {
        return Err(ListcraftError::invalid_input(format!(
            "reorder lists {} of {} photos",
            seen.len(),
            known.len()
        )));
    }

    Ok(())
}

/// Renumbers `photos` `0..n-1` in slice order, keeping their sequence.
pub fn renumber(photos: &mut [PhotoRecord]) {
    for (index, photo) in photos.iter_mut().enumerate() {
        photo.sort_order = index as u32;
    }
}

/// Whether `photos` is numbered `0..n-1` in slice order.
pub fn is_contiguous(photos: &[PhotoRecord]) -> bool {
    photos
        .iter()
        .enumerate()
        .all(|(index, photo)| photo.sort_order as usize == index)
}
