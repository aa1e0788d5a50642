//! # Wrap window: occupancy token plus bounded pending list.
//!
//! The engine treats "execute a command and record that it happened" as
//! one logical unit, the *wrap window*. At any given time **one** wrap
//! occupies the window; concurrent requests queue FIFO behind it, up to a
//! fixed capacity.
//!
//! ## Admission
//! - Window free → the request becomes the occupant immediately.
//! - Window busy, pending list has room → the request is enqueued and its
//!   caller suspends until its own window closes.
//! - Pending list full → the request is **dropped**: not invoked, not
//!   recorded, no events, and the caller's completion settles with no
//!   observable effect (silent backpressure, drop-newest-when-full).
//!
//! ## Invariants
//! - Admission (occupancy check, capacity check, enqueue-or-drop) and the
//!   promotion of the next occupant each run under the one lock, so no
//!   other admission interleaves between check and mutation.
//! - Queued requests are executed strictly in submission order.
//! - Recording-state transitions that arrive while the window is open are
//!   deferred here and applied, in arrival order, when the current
//!   window closes.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::events::RecordingStateReason;
use crate::specs::CommandSpec;

/// Outcome of an admission attempt.
pub(crate) enum Admission {
    /// The caller occupies the window and must run the drain loop.
    Occupant(CommandSpec),
    /// The request was enqueued; the receiver resolves when its window
    /// has closed.
    Queued(oneshot::Receiver<()>),
    /// The pending list was full; the request vanished without trace.
    Dropped,
}

/// One enqueued wrap request.
pub(crate) struct PendingWrap {
    pub spec: CommandSpec,
    pub done: oneshot::Sender<()>,
}

struct WindowState {
    occupied: bool,
    pending: VecDeque<PendingWrap>,
    deferred: Vec<RecordingStateReason>,
}

/// Occupancy token and bounded FIFO of pending wrap requests.
pub(crate) struct WrapWindow {
    state: Mutex<WindowState>,
    capacity: usize,
}

impl WrapWindow {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(WindowState {
                occupied: false,
                pending: VecDeque::new(),
                deferred: Vec::new(),
            }),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, WindowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admits, queues, or drops a wrap request in one critical section.
    pub(crate) fn admit(&self, spec: CommandSpec) -> Admission {
        let mut st = self.lock();
        if !st.occupied {
            st.occupied = true;
            return Admission::Occupant(spec);
        }
        if st.pending.len() < self.capacity {
            let (done, rx) = oneshot::channel();
            st.pending.push_back(PendingWrap { spec, done });
            return Admission::Queued(rx);
        }
        Admission::Dropped
    }

    /// Promotes the next pending request, or releases occupancy when the
    /// pending list is empty.
    pub(crate) fn next(&self) -> Option<PendingWrap> {
        let mut st = self.lock();
        match st.pending.pop_front() {
            Some(pending) => Some(pending),
            None => {
                st.occupied = false;
                None
            }
        }
    }

    /// Defers a recording-state transition if the window is open.
    /// Returns false when the window is free and the transition should be
    /// applied immediately.
    pub(crate) fn defer_if_open(&self, reason: RecordingStateReason) -> bool {
        let mut st = self.lock();
        if st.occupied {
            st.deferred.push(reason);
            true
        } else {
            false
        }
    }

    /// Takes the transitions deferred while the closing window was open.
    pub(crate) fn take_deferred(&self) -> Vec<RecordingStateReason> {
        std::mem::take(&mut self.lock().deferred)
    }
}
