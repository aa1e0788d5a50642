//! Engine state-transition events and the single-slot hub that delivers them.

mod hub;

pub use hub::{
    ActiveStateEvent, ActiveStateHandler, EventHub, PlaybackStateEvent, PlaybackStateHandler,
    PlaybackStateReason, RecordingStateEvent, RecordingStateHandler, RecordingStateReason,
    WrapHandler, WrapMode,
};
