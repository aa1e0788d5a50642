//! # Engine configuration.
//!
//! [`EngineConfig`] holds the few knobs the engine exposes: the wrap queue
//! capacity and the prompt text used by `repeat_playback`. The command
//! names the engine registers for itself are fixed constants, mirroring
//! how the host binds them to keybindings.

/// Default capacity of the wrap pending list.
///
/// Bounds how many concurrent wrap requests may wait behind the current
/// occupant. Requests arriving beyond this bound are dropped silently
/// (availability over completeness).
pub const WRAP_QUEUE_SIZE: usize = 32;

/// Command name under which the engine registers its own wrap entry.
///
/// Wrapping this command itself is direct self-reentry and is fully
/// suppressed; dispatching it from inside an open wrap window is the
/// indirect-recursion path.
pub const WRAP_COMMAND: &str = "macrovisor.wrap";

/// Command name under which the engine registers playback.
///
/// A recorded macro exported as a keybinding invokes this command; a
/// wrap of this command replays the embedded sequence and records the
/// replayed specs rather than the playback spec itself.
pub const PLAYBACK_COMMAND: &str = "macrovisor.playback";

/// Configuration for a [`MacroEngine`](crate::MacroEngine).
///
/// ## Example
/// ```
/// use macrovisor::EngineConfig;
///
/// let mut cfg = EngineConfig::default();
/// cfg.wrap_queue_size = 8;
/// assert_eq!(cfg.wrap_queue_size_clamped(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Capacity of the bounded wrap pending list.
    pub wrap_queue_size: usize,
    /// Prompt text shown by `repeat_playback` via the input-box hook.
    pub repeat_prompt: String,
}

impl Default for EngineConfig {
    /// Provides a default configuration:
    /// - `wrap_queue_size = WRAP_QUEUE_SIZE` (32)
    /// - `repeat_prompt = "Number of times to repeat the macro"`
    fn default() -> Self {
        Self {
            wrap_queue_size: WRAP_QUEUE_SIZE,
            repeat_prompt: "Number of times to repeat the macro".to_string(),
        }
    }
}

impl EngineConfig {
    /// Returns the queue capacity with a minimum of 1 (clamped).
    pub fn wrap_queue_size_clamped(&self) -> usize {
        self.wrap_queue_size.max(1)
    }
}
