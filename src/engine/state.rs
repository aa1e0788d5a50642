//! # Recording/playback state machine.
//!
//! [`MacroState`] owns the two sub-state machines (recording and playback)
//! and the in-progress sequence buffer. It is a pure structure: transition
//! methods mutate state and **return** the events to fire, so the engine
//! can publish them after releasing the lock.
//!
//! ## Rules
//! - Recording and the buffer live together: `start` clears the buffer,
//!   `cancel` discards it, `finish` preserves it for retrieval.
//! - The buffer is mutable only while recording; snapshots handed out are
//!   copies, never aliases of the live buffer.
//! - Active is derived (`recording || playing`); a transition report
//!   includes an active event only when the derived value actually flips.
//! - At most one playback is ever active; `begin_playback` refuses a
//!   second one.

use crate::events::{
    ActiveStateEvent, PlaybackStateEvent, PlaybackStateReason, RecordingStateEvent,
    RecordingStateReason,
};
use crate::specs::CommandSpec;

/// Events produced by one state transition, in firing order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Transition {
    pub recording: Option<RecordingStateEvent>,
    pub playback: Option<PlaybackStateEvent>,
    pub active: Option<ActiveStateEvent>,
}

/// The engine's mutable state: both sub-state machines plus the buffer.
pub(crate) struct MacroState {
    recording: bool,
    playing: bool,
    sequence: Vec<CommandSpec>,
}

impl MacroState {
    pub(crate) fn new() -> Self {
        Self {
            recording: false,
            playing: false,
            sequence: Vec::new(),
        }
    }

    pub(crate) fn is_recording(&self) -> bool {
        self.recording
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.playing
    }

    /// Starts recording. No-op while already recording, and also while a
    /// playback is running: a replayed command must not preempt playback
    /// by flipping the engine into recording mid-run.
    pub(crate) fn start_recording(&mut self) -> Option<Transition> {
        if self.recording || self.playing {
            return None;
        }
        self.recording = true;
        self.sequence.clear();
        Some(Transition {
            recording: Some(RecordingStateEvent {
                recording: true,
                reason: RecordingStateReason::Start,
            }),
            playback: None,
            // playing is false here, so active always flips.
            active: Some(ActiveStateEvent { active: true }),
        })
    }

    /// Stops recording with `Finish` (buffer preserved) or `Cancel`
    /// (buffer discarded). No-op while idle.
    pub(crate) fn stop_recording(&mut self, reason: RecordingStateReason) -> Option<Transition> {
        if !self.recording {
            return None;
        }
        if reason == RecordingStateReason::Cancel {
            self.sequence.clear();
        }
        self.recording = false;
        Some(Transition {
            recording: Some(RecordingStateEvent {
                recording: false,
                reason,
            }),
            playback: None,
            active: (!self.playing).then_some(ActiveStateEvent { active: false }),
        })
    }

    /// Enters playback. `None` if a playback is already in progress.
    pub(crate) fn begin_playback(&mut self) -> Option<Transition> {
        if self.playing {
            return None;
        }
        self.playing = true;
        Some(Transition {
            recording: None,
            playback: Some(PlaybackStateEvent {
                playing: true,
                reason: PlaybackStateReason::Start,
            }),
            active: (!self.recording).then_some(ActiveStateEvent { active: true }),
        })
    }

    /// Leaves playback with the given closing reason.
    pub(crate) fn end_playback(&mut self, reason: PlaybackStateReason) -> Option<Transition> {
        if !self.playing {
            return None;
        }
        self.playing = false;
        Some(Transition {
            recording: None,
            playback: Some(PlaybackStateEvent {
                playing: false,
                reason,
            }),
            active: (!self.recording).then_some(ActiveStateEvent { active: false }),
        })
    }

    /// Appends the spec to the buffer iff recording and the spec is not in
    /// side-effect mode. Never errors.
    pub(crate) fn push(&mut self, spec: CommandSpec) {
        if self.recording && !spec.is_side_effect() {
            self.sequence.push(spec);
        }
    }

    /// Immutable snapshot of the buffer at call time.
    pub(crate) fn snapshot(&self) -> Vec<CommandSpec> {
        self.sequence.clone()
    }
}
