//! # MacroEngine: the recording/playback facade.
//!
//! [`MacroEngine`] owns the state machine, the wrap window, the internal
//! registry, the event hub, and the hook slots, and coordinates them into
//! the public surface.
//!
//! ## Control flow
//! ```text
//! wrap(raw)
//!   └─► normalize ──► admission (occupancy / capacity / drop)
//!         └─► window loop (occupant drains FIFO):
//!               ├─► fire on_begin_wrapped_command(mode)
//!               ├─► dispatch: Registry ─or─ HostExecutor, then `await` token
//!               ├─► ok?  ──► push to sequence (recording, not side-effect,
//!               │            not the playback command)
//!               ├─► err? ──► error hook once, nothing recorded
//!               ├─► fire on_end_wrapped_command(mode)
//!               ├─► apply deferred finish/cancel
//!               └─► promote next pending entry, or release occupancy
//!
//! playback(args)
//!   ├─► validate args (repeat / sequence recovery)
//!   ├─► recording + explicit sequence ──► route through wrap() as a
//!   │       {command: "macrovisor.playback"} spec (record-while-replay)
//!   ├─► recording, no sequence ──► no-op
//!   └─► otherwise: Start event; repeat × sequence, strictly sequential;
//!       first failure stops with Finish; abort flag closes with Abort
//! ```
//!
//! ## Recursion rules
//! - Wrapping the wrap command itself is direct self-reentry: fully
//!   suppressed (no invocation, no queueing, no events).
//! - A handler dispatching the wrap command while its own window is open
//!   is indirect recursion: the inner command runs exactly once through
//!   plain dispatch, with no window and no recording of its own.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::commands::{
    AwaitTracker, CommandFn, CommandRef, HostExecutor, NullHost, Registry, SettledAwaits,
};
use crate::config::{EngineConfig, PLAYBACK_COMMAND, WRAP_COMMAND};
use crate::error::ExecError;
use crate::events::{EventHub, PlaybackStateReason, RecordingStateReason};
use crate::hooks::Hooks;
use crate::specs::{validate_playback_args, CommandSpec, PlaybackArgs};

use super::export;
use super::state::{MacroState, Transition};
use super::window::{Admission, PendingWrap, WrapWindow};

/// The recording/playback engine.
///
/// Construct one with [`MacroEngine::builder`], inject the host executor,
/// then drive it through the public operations. All methods take `&self`;
/// the engine is designed to live in an `Arc` and be shared with command
/// handlers.
pub struct MacroEngine {
    config: EngineConfig,
    registry: Registry,
    host: Arc<dyn HostExecutor>,
    awaits: Arc<dyn AwaitTracker>,
    hooks: Hooks,
    events: EventHub,
    state: Mutex<MacroState>,
    window: WrapWindow,
    abort: Mutex<CancellationToken>,
}

impl MacroEngine {
    /// Returns a builder for the engine.
    pub fn builder(config: EngineConfig) -> MacroEngineBuilder {
        MacroEngineBuilder::new(config)
    }

    fn state(&self) -> MutexGuard<'_, MacroState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn abort_token(&self) -> MutexGuard<'_, CancellationToken> {
        self.abort.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fire(&self, transition: Transition) {
        if let Some(ev) = transition.recording {
            self.events.fire_recording(ev);
        }
        if let Some(ev) = transition.playback {
            self.events.fire_playback(ev);
        }
        if let Some(ev) = transition.active {
            self.events.fire_active(ev);
        }
    }

    /// The engine's event subscriptions (single-slot, replaceable).
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    /// The engine's injectable hooks (message, input, error, clipboard).
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Registers a local handler for a command name (idempotent
    /// overwrite). Registered names take precedence over the host
    /// executor on dispatch.
    pub fn register_internal_command(&self, name: impl Into<String>, handler: CommandRef) {
        self.registry.register(name, handler);
    }

    // ---- Recording ----------------------------------------------------

    /// Starts recording: clears the buffer and fires `Start`.
    ///
    /// No-op while already recording, and while a playback is running.
    pub fn start_recording(&self) {
        let transition = { self.state().start_recording() };
        if let Some(t) = transition {
            self.fire(t);
        }
    }

    /// Stops recording, preserving the buffer. No-op while idle.
    ///
    /// If a wrap window is open the transition is deferred until that
    /// window closes, so the in-flight occupant's recording completes
    /// first.
    pub fn finish_recording(&self) {
        self.stop_recording(RecordingStateReason::Finish);
    }

    /// Stops recording, discarding the buffer. No-op while idle.
    /// Deferred like [`finish_recording`](Self::finish_recording) while a
    /// wrap window is open.
    pub fn cancel_recording(&self) {
        self.stop_recording(RecordingStateReason::Cancel);
    }

    fn stop_recording(&self, reason: RecordingStateReason) {
        if self.window.defer_if_open(reason) {
            return;
        }
        self.apply_stop(reason);
    }

    fn apply_stop(&self, reason: RecordingStateReason) {
        let transition = { self.state().stop_recording(reason) };
        if let Some(t) = transition {
            self.fire(t);
        }
    }

    /// Appends a command to the sequence iff recording and the spec is
    /// not in side-effect mode. Unnormalizable input is ignored; never
    /// errors.
    pub fn push(&self, raw: &Value) {
        if let Some(spec) = CommandSpec::normalize(raw) {
            self.push_spec(spec);
        }
    }

    fn push_spec(&self, spec: CommandSpec) {
        self.state().push(spec);
    }

    /// Snapshot of the recorded sequence at call time (a copy, never an
    /// alias of the live buffer).
    pub fn current_sequence(&self) -> Vec<CommandSpec> {
        self.state().snapshot()
    }

    /// True while recording is active.
    pub fn is_recording(&self) -> bool {
        self.state().is_recording()
    }

    /// True while a playback is running.
    pub fn is_playing(&self) -> bool {
        self.state().is_playing()
    }

    // ---- Dispatch ------------------------------------------------------

    /// Dispatches a named command: internal registry first, host executor
    /// for everything else. Unknown in both yields
    /// [`ExecError::UnknownCommand`].
    pub async fn dispatch(&self, command: &str, args: Option<&Value>) -> Result<(), ExecError> {
        match self.registry.resolve(command) {
            Some(handler) => handler.run(args).await,
            None => self.host.dispatch(command, args).await,
        }
    }

    /// Dispatch plus the spec's `await` condition, if any.
    async fn invoke(&self, spec: &CommandSpec) -> Result<(), ExecError> {
        self.dispatch(&spec.command, spec.args.as_ref()).await?;
        if let Some(condition) = &spec.await_ {
            self.awaits.wait_for(condition).await;
        }
        Ok(())
    }

    // ---- Wrap ----------------------------------------------------------

    /// Executes a command and, while recording, records it — as one
    /// logical unit with respect to concurrent wraps, recursion, and
    /// recording-state transitions.
    ///
    /// Unnormalizable input is rejected silently. Overflowing the pending
    /// list drops the call with no observable effect. The completion
    /// always settles normally; execution failures go through the error
    /// hook.
    pub async fn wrap(&self, raw: &Value) {
        let Some(spec) = CommandSpec::normalize(raw) else {
            return;
        };
        self.wrap_spec(spec).await;
    }

    async fn wrap_spec(&self, spec: CommandSpec) {
        // Direct self-reentry: wrapping the wrap command itself.
        if spec.command == WRAP_COMMAND {
            return;
        }
        match self.window.admit(spec) {
            Admission::Dropped => {}
            Admission::Queued(rx) => {
                // Resolves when this entry's own window has closed. A
                // dropped sender means the runtime is tearing down.
                let _ = rx.await;
            }
            Admission::Occupant(spec) => self.run_window(spec).await,
        }
    }

    /// The occupant's drain loop: one begin/end window per entry, FIFO.
    async fn run_window(&self, first: CommandSpec) {
        let mut current = first;
        let mut done: Option<tokio::sync::oneshot::Sender<()>> = None;
        loop {
            let mode = current.wrap_mode();
            self.events.fire_begin_wrap(mode);
            match self.invoke(&current).await {
                Ok(()) => {
                    // The playback command records the specs it replays
                    // rather than itself.
                    if current.command != PLAYBACK_COMMAND {
                        self.push_spec(current.clone());
                    }
                }
                Err(err) => self.hooks.print_error(&err),
            }
            self.events.fire_end_wrap(mode);
            for reason in self.window.take_deferred() {
                self.apply_stop(reason);
            }
            if let Some(tx) = done.take() {
                let _ = tx.send(());
            }
            match self.window.next() {
                Some(PendingWrap { spec, done: tx }) => {
                    current = spec;
                    done = Some(tx);
                }
                None => break,
            }
        }
    }

    /// Indirect-recursion path: the registered wrap command, reached
    /// through ordinary dispatch from inside an open window. The inner
    /// command executes exactly once with no window and no recording.
    async fn wrap_nested(&self, raw: Option<&Value>) -> Result<(), ExecError> {
        let Some(spec) = raw.and_then(CommandSpec::normalize) else {
            return Ok(());
        };
        if spec.command == WRAP_COMMAND {
            return Ok(());
        }
        self.invoke(&spec).await
    }

    // ---- Playback ------------------------------------------------------

    /// Replays a sequence with the validated `{repeat, sequence}`
    /// arguments.
    ///
    /// - While a playback is already running: no-op, no events.
    /// - While recording, with an explicit `sequence`: routed through the
    ///   wrap window so the whole run is one wrapped unit and every
    ///   successfully replayed spec is recorded.
    /// - While recording, without a `sequence`: no-op.
    pub async fn playback(&self, raw: Option<&Value>) {
        let args = validate_playback_args(raw, self.hooks.messages().as_ref());
        if self.is_recording() {
            if args.sequence.is_some() {
                self.wrap_spec(playback_wrap_spec(&args)).await;
            }
            return;
        }
        self.run_playback(args).await;
    }

    async fn run_playback(&self, args: PlaybackArgs) {
        let PlaybackArgs { repeat, sequence } = args;
        let (transition, sequence) = {
            let mut st = self.state();
            match st.begin_playback() {
                Some(t) => (t, sequence.unwrap_or_else(|| st.snapshot())),
                None => return,
            }
        };
        self.fire(transition);

        let abort = CancellationToken::new();
        *self.abort_token() = abort.clone();

        let repeat = repeat.unwrap_or(1);
        let mut reason = PlaybackStateReason::Finish;
        'repeats: for _ in 0..repeat {
            if abort.is_cancelled() {
                reason = PlaybackStateReason::Abort;
                break;
            }
            for spec in &sequence {
                if abort.is_cancelled() {
                    reason = PlaybackStateReason::Abort;
                    break 'repeats;
                }
                match self.invoke(spec).await {
                    // Record-while-replay: a no-op unless recording.
                    Ok(()) => self.push_spec(spec.clone()),
                    Err(err) => {
                        self.hooks.print_error(&err);
                        break 'repeats;
                    }
                }
            }
        }

        let transition = { self.state().end_playback(reason) };
        if let Some(t) = transition {
            self.fire(t);
        }
    }

    /// Requests a cooperative stop of the running playback.
    ///
    /// The flag is observed only between one command's completion and the
    /// next command's start (and between repeat iterations); the in-flight
    /// command always completes first.
    pub fn abort_playback(&self) {
        self.abort_token().cancel();
    }

    /// Prompts for a repeat count and replays the recorded sequence that
    /// many times.
    ///
    /// Skipped entirely while recording. A dismissed prompt or anything
    /// that is not a positive integer cancels without a playback attempt.
    pub async fn repeat_playback(&self) {
        if self.is_recording() {
            return;
        }
        let Some(input) = self.hooks.read_input(&self.config.repeat_prompt).await else {
            return;
        };
        let Ok(count) = input.trim().parse::<u64>() else {
            return;
        };
        if count == 0 {
            return;
        }
        self.run_playback(PlaybackArgs::repeat(count)).await;
    }

    // ---- Export --------------------------------------------------------

    /// Renders the recorded sequence as a keybinding entry and hands it
    /// to the clipboard sink.
    ///
    /// With nothing recorded, writes nothing and shows a message instead.
    pub async fn export_as_keybinding(&self) {
        let sequence = self.current_sequence();
        if sequence.is_empty() {
            self.hooks.show_message("There's no recorded macro.");
            return;
        }
        let text = export::keybinding_json(&sequence, PLAYBACK_COMMAND);
        self.hooks.write_clipboard(&text).await;
        self.hooks.show_message("Copied the recorded macro to the clipboard!");
    }
}

/// The spec a record-while-replay playback travels through the wrap
/// window as.
fn playback_wrap_spec(args: &PlaybackArgs) -> CommandSpec {
    let mut payload = serde_json::Map::new();
    if let Some(repeat) = args.repeat {
        payload.insert("repeat".to_string(), Value::from(repeat));
    }
    if let Some(sequence) = &args.sequence {
        let rendered =
            serde_json::to_value(sequence).unwrap_or_else(|_| Value::Array(Vec::new()));
        payload.insert("sequence".to_string(), rendered);
    }
    CommandSpec {
        command: PLAYBACK_COMMAND.to_string(),
        args: Some(Value::Object(payload)),
        await_: None,
        record: None,
    }
}

/// Builder for constructing a [`MacroEngine`] with its collaborators.
pub struct MacroEngineBuilder {
    config: EngineConfig,
    host: Arc<dyn HostExecutor>,
    awaits: Arc<dyn AwaitTracker>,
}

impl MacroEngineBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            host: Arc::new(NullHost),
            awaits: Arc::new(SettledAwaits),
        }
    }

    /// Sets the host command executor (external dispatch facility).
    pub fn with_host(mut self, host: Arc<dyn HostExecutor>) -> Self {
        self.host = host;
        self
    }

    /// Sets the tracker that observes `await` condition tokens.
    pub fn with_await_tracker(mut self, awaits: Arc<dyn AwaitTracker>) -> Self {
        self.awaits = awaits;
        self
    }

    /// Builds the engine and registers its built-in commands.
    pub fn build(self) -> Arc<MacroEngine> {
        let engine = Arc::new(MacroEngine {
            window: WrapWindow::new(self.config.wrap_queue_size_clamped()),
            config: self.config,
            registry: Registry::new(),
            host: self.host,
            awaits: self.awaits,
            hooks: Hooks::new(),
            events: EventHub::new(),
            state: Mutex::new(MacroState::new()),
            abort: Mutex::new(CancellationToken::new()),
        });
        register_builtins(&engine);
        engine
    }
}

/// Registers the wrap and playback commands the engine exposes to the
/// host's command system. Held through `Weak` so the registry does not
/// keep the engine alive.
fn register_builtins(engine: &Arc<MacroEngine>) {
    let weak = Arc::downgrade(engine);
    engine.registry.register(
        WRAP_COMMAND,
        CommandFn::arc(move |args: Option<Value>| {
            let weak = weak.clone();
            async move {
                match weak.upgrade() {
                    Some(engine) => engine.wrap_nested(args.as_ref()).await,
                    None => Ok(()),
                }
            }
        }),
    );

    let weak = Arc::downgrade(engine);
    engine.registry.register(
        PLAYBACK_COMMAND,
        CommandFn::arc(move |args: Option<Value>| {
            let weak = weak.clone();
            async move {
                if let Some(engine) = weak.upgrade() {
                    let parsed =
                        validate_playback_args(args.as_ref(), engine.hooks.messages().as_ref());
                    engine.run_playback(parsed).await;
                }
                Ok(())
            }
        }),
    );
}
