//! Generation surfaces.
//!
//! - `store`: observable session and history state backed by `ListingCommands`
//! - `session`: per-session event routing
//! - `controller`: request dispatch and drain task lifecycle

mod controller;
mod session;
mod store;

pub use controller::{GenerationHandle, StreamingSessionController};
pub use session::EventDisposition;
pub use store::GenerationStore;
