//! Generation domain module.
//!
//! # Module Structure
//!
//! - `model`: generation kinds, listing options and persisted `GenerationRecord`
//! - `request`: outbound request parameters (`GenerationRequest`)
//! - `event`: backend stream events and the `EventSink` channel
//! - `state`: pure session/history state machine (`GenerationState`)

mod event;
mod model;
mod request;
mod state;

pub use event::{EventSink, SinkClosed, StreamEvent};
pub use model::{
    EmailTemplate, GenerationRecord, GenerationType, ListingLength, ListingStyle, ListingTone,
    SocialPlatform, listing_history,
};
pub use request::{EmailParams, GenerationRequest, ListingParams, SocialParams};
pub use state::{GenerationSession, GenerationState, GenerationStatus, GenerationUsage, SessionId};
