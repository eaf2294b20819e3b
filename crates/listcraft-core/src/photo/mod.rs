//! Photo domain module.

mod model;
mod ordering;

pub use model::{MAX_PHOTOS, PhotoRecord};
pub use ordering::{is_contiguous, renumber, reorder};
