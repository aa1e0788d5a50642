//! Command descriptors and playback-argument validation.

mod args;
mod spec;

pub use args::{validate_playback_args, PlaybackArgs};
pub use spec::CommandSpec;
