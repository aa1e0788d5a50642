//! The macro engine: recording state machine, wrap synchronization
//! queue, playback loop, and keybinding export.

mod core;
mod export;
mod state;
mod window;

pub use self::core::{MacroEngine, MacroEngineBuilder};
