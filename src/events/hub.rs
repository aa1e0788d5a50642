//! # Single-slot event hub.
//!
//! [`EventHub`] delivers the engine's five state-transition notifications.
//! Unlike a broadcast bus, each event kind holds **at most one** current
//! listener:
//!
//! ```text
//! Engine ──► EventHub ──► [slot: recording]  ──► on_change_recording_state
//!                         [slot: active]     ──► on_change_active_state
//!                         [slot: playback]   ──► on_change_playback_state
//!                         [slot: begin-wrap] ──► on_begin_wrapped_command
//!                         [slot: end-wrap]   ──► on_end_wrapped_command
//! ```
//!
//! ## Rules
//! - Registration **overwrites** the current listener for that slot.
//! - Passing `None` clears the slot.
//! - Firing with an empty slot is a normal no-op.
//! - Listeners are plain callbacks invoked inline at the transition point;
//!   they must not block.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::sync::Arc;

/// Reason attached to a recording-state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordingStateReason {
    /// Recording started; the sequence buffer was cleared.
    Start,
    /// Recording finished; the buffer is preserved for retrieval.
    Finish,
    /// Recording was cancelled; the buffer was discarded.
    Cancel,
}

/// Reason attached to a playback-state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStateReason {
    /// Playback started.
    Start,
    /// Playback ran to completion, or stopped at a failing entry.
    ///
    /// A dispatch failure ends playback normally from the state machine's
    /// point of view; the error itself travels through the error hook.
    Finish,
    /// Playback was stopped by an explicit abort request.
    Abort,
}

/// Mode of a wrapped command, derived from the spec's `record` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    /// Ordinary wrap: executed and, while recording, appended to the
    /// sequence.
    Command,
    /// Side-effect wrap: executed but never recorded.
    SideEffect,
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapMode::Command => f.write_str("command"),
            WrapMode::SideEffect => f.write_str("side-effect"),
        }
    }
}

/// Payload of `on_change_recording_state`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordingStateEvent {
    /// Whether recording is active after the transition.
    pub recording: bool,
    /// Why the transition happened.
    pub reason: RecordingStateReason,
}

/// Payload of `on_change_playback_state`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackStateEvent {
    /// Whether playback is active after the transition.
    pub playing: bool,
    /// Why the transition happened.
    pub reason: PlaybackStateReason,
}

/// Payload of `on_change_active_state`.
///
/// Active is the derived state: true iff recording or playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveStateEvent {
    /// Whether either sub-state machine is active after the transition.
    pub active: bool,
}

/// Listener for recording-state transitions.
pub type RecordingStateHandler = Arc<dyn Fn(RecordingStateEvent) + Send + Sync>;
/// Listener for playback-state transitions.
pub type PlaybackStateHandler = Arc<dyn Fn(PlaybackStateEvent) + Send + Sync>;
/// Listener for active-state transitions.
pub type ActiveStateHandler = Arc<dyn Fn(ActiveStateEvent) + Send + Sync>;
/// Listener for wrap window begin/end notifications.
pub type WrapHandler = Arc<dyn Fn(WrapMode) + Send + Sync>;

/// One replaceable listener slot.
struct Slot<T>(Mutex<Option<T>>);

impl<T: Clone> Slot<T> {
    fn empty() -> Self {
        Slot(Mutex::new(None))
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, value: Option<T>) {
        *self.lock() = value;
    }

    fn get(&self) -> Option<T> {
        self.lock().clone()
    }
}

/// Single-slot event delivery for the engine's state transitions.
pub struct EventHub {
    recording: Slot<RecordingStateHandler>,
    playback: Slot<PlaybackStateHandler>,
    active: Slot<ActiveStateHandler>,
    begin_wrap: Slot<WrapHandler>,
    end_wrap: Slot<WrapHandler>,
}

impl EventHub {
    pub(crate) fn new() -> Self {
        Self {
            recording: Slot::empty(),
            playback: Slot::empty(),
            active: Slot::empty(),
            begin_wrap: Slot::empty(),
            end_wrap: Slot::empty(),
        }
    }

    /// Replaces the recording-state listener; `None` clears it.
    pub fn set_on_change_recording_state(&self, handler: Option<RecordingStateHandler>) {
        self.recording.set(handler);
    }

    /// Replaces the playback-state listener; `None` clears it.
    pub fn set_on_change_playback_state(&self, handler: Option<PlaybackStateHandler>) {
        self.playback.set(handler);
    }

    /// Replaces the active-state listener; `None` clears it.
    pub fn set_on_change_active_state(&self, handler: Option<ActiveStateHandler>) {
        self.active.set(handler);
    }

    /// Replaces the wrap-begin listener; `None` clears it.
    pub fn set_on_begin_wrapped_command(&self, handler: Option<WrapHandler>) {
        self.begin_wrap.set(handler);
    }

    /// Replaces the wrap-end listener; `None` clears it.
    pub fn set_on_end_wrapped_command(&self, handler: Option<WrapHandler>) {
        self.end_wrap.set(handler);
    }

    pub(crate) fn fire_recording(&self, ev: RecordingStateEvent) {
        if let Some(handler) = self.recording.get() {
            handler(ev);
        }
    }

    pub(crate) fn fire_playback(&self, ev: PlaybackStateEvent) {
        if let Some(handler) = self.playback.get() {
            handler(ev);
        }
    }

    pub(crate) fn fire_active(&self, ev: ActiveStateEvent) {
        if let Some(handler) = self.active.get() {
            handler(ev);
        }
    }

    pub(crate) fn fire_begin_wrap(&self, mode: WrapMode) {
        if let Some(handler) = self.begin_wrap.get() {
            handler(mode);
        }
    }

    pub(crate) fn fire_end_wrap(&self, mode: WrapMode) {
        if let Some(handler) = self.end_wrap.get() {
            handler(mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[test]
    fn test_slot_overwrites_and_clears() {
        let hub = EventHub::new();
        let seen: Arc<StdMutex<Vec<bool>>> = Arc::new(StdMutex::new(Vec::new()));

        let first = seen.clone();
        hub.set_on_change_active_state(Some(Arc::new(move |ev| {
            first.lock().unwrap().push(ev.active);
        })));
        hub.fire_active(ActiveStateEvent { active: true });

        // Overwrite: the first listener must not fire again.
        hub.set_on_change_active_state(Some(Arc::new(|_| {})));
        hub.fire_active(ActiveStateEvent { active: false });
        assert_eq!(*seen.lock().unwrap(), vec![true]);

        // Clear: firing with an empty slot is a no-op.
        hub.set_on_change_active_state(None);
        hub.fire_active(ActiveStateEvent { active: true });
        assert_eq!(*seen.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_wrap_mode_labels() {
        assert_eq!(WrapMode::Command.to_string(), "command");
        assert_eq!(WrapMode::SideEffect.to_string(), "side-effect");
    }
}
