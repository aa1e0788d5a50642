//! # macrovisor
//!
//! **Macrovisor** is a macro recording and playback engine for editor-like
//! hosts.
//!
//! It provides primitives to record commands as they execute, replay the
//! recorded sequence (optionally repeated), and export it as a keybinding
//! entry. The crate is designed as the engine behind a host integration:
//! the host forwards its command traffic through the wrap entry point and
//! injects its own UI and dispatch facilities.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ CommandSpec  │   │ CommandSpec  │   │ CommandSpec  │
//!     │ (wrap req 1) │   │ (wrap req 2) │   │ (wrap req 3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  MacroEngine                                                      │
//! │  - WrapWindow (occupancy + bounded FIFO of pending wraps)         │
//! │  - MacroState (recording/playback flags + sequence buffer)        │
//! │  - Registry (internal command handlers by name)                   │
//! │  - EventHub (single-slot state-change subscriptions)              │
//! │  - Hooks (message / input / error / clipboard seams)              │
//! └──────┬──────────────────────────────┬─────────────────────────────┘
//!        ▼                              ▼
//! ┌──────────────────┐       ┌──────────────────────┐
//! │  HostExecutor    │       │  AwaitTracker        │
//! │ (external        │       │ (settles the spec's  │
//! │  dispatch)       │       │  `await` conditions) │
//! └──────────────────┘       └──────────────────────┘
//! ```
//!
//! ### Wrap lifecycle
//! ```text
//! wrap(raw) ──► normalize ──► WrapWindow::admit
//!
//! occupant loop {
//!   ├─► fire on_begin_wrapped_command(mode)
//!   ├─► dispatch (Registry, else HostExecutor), then `await` token
//!   │       ├─ Ok  ──► record into sequence (iff recording, not
//!   │       │          side-effect, not the playback command)
//!   │       └─ Err ──► error hook, nothing recorded
//!   ├─► fire on_end_wrapped_command(mode)
//!   ├─► apply finish/cancel transitions deferred during the window
//!   ├─► resolve the entry's completion
//!   └─► promote next pending entry, or release occupancy
//! }
//!
//! Overflowing the pending list drops the request silently.
//! Wrapping the wrap command itself is suppressed entirely; dispatching
//! it from inside a window runs the inner command once, unrecorded.
//! ```
//!
//! ## Features
//! | Area            | Description                                                       | Key types / traits                          |
//! |-----------------|-------------------------------------------------------------------|---------------------------------------------|
//! | **Recording**   | Start/finish/cancel a session; push or wrap commands into it.     | [`MacroEngine`], [`CommandSpec`]            |
//! | **Playback**    | Replay sequences with repeat, abort, and failure truncation.      | [`PlaybackArgs`], [`validate_playback_args`]|
//! | **Commands**    | Register async handlers; delegate the rest to the host.           | [`Command`], [`CommandFn`], [`HostExecutor`]|
//! | **Events**      | Observe recording/playback/active transitions and wrap windows.   | [`EventHub`], [`RecordingStateEvent`]       |
//! | **Hooks**       | Inject message, input-box, error, and clipboard surfaces.         | [`Hooks`], [`MessageSink`], [`InputPrompt`] |
//! | **Export**      | Render the recorded sequence as a keybinding entry.               | [`MacroEngine::export_as_keybinding`]       |
//! | **Errors**      | Typed execution errors with stable labels.                        | [`ExecError`]                               |
//! | **Configuration**| Queue capacity and prompt text.                                  | [`EngineConfig`]                            |
//!
//! ## Example
//! ```rust
//! use macrovisor::{CommandFn, CommandRef, EngineConfig, MacroEngine};
//! use serde_json::{json, Value};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let engine = MacroEngine::builder(EngineConfig::default()).build();
//!
//!     // A local command the engine can dispatch without a host.
//!     let hello: CommandRef = CommandFn::arc(|_args: Option<Value>| async {
//!         println!("hello from a macro!");
//!         Ok(())
//!     });
//!     engine.register_internal_command("demo.hello", hello);
//!
//!     // Record one command, then replay it.
//!     engine.start_recording();
//!     engine.wrap(&json!({ "command": "demo.hello" })).await;
//!     engine.finish_recording();
//!     assert_eq!(engine.current_sequence().len(), 1);
//!
//!     engine.playback(None).await;
//! }
//! ```
mod commands;
mod config;
mod engine;
mod error;
mod events;
mod hooks;
mod specs;

// ---- Public re-exports ----

pub use commands::{
    AwaitTracker, Command, CommandFn, CommandRef, HostExecutor, NullHost, SettledAwaits,
};
pub use config::{EngineConfig, PLAYBACK_COMMAND, WRAP_COMMAND, WRAP_QUEUE_SIZE};
pub use engine::{MacroEngine, MacroEngineBuilder};
pub use error::ExecError;
pub use events::{
    ActiveStateEvent, ActiveStateHandler, EventHub, PlaybackStateEvent, PlaybackStateHandler,
    PlaybackStateReason, RecordingStateEvent, RecordingStateHandler, RecordingStateReason,
    WrapHandler, WrapMode,
};
pub use hooks::{
    ClipboardSink, ErrorPrinter, Hooks, InputPrompt, MessageSink, NullClipboard, NullPrompt,
    StderrErrors, StdoutMessages,
};
pub use specs::{validate_playback_args, CommandSpec, PlaybackArgs};
