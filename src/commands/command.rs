//! # Command abstraction and function-backed handlers.
//!
//! This module defines the [`Command`] trait (async, fallible) and a
//! convenient function-backed implementation [`CommandFn`]. The common
//! handle type is [`CommandRef`], an `Arc<dyn Command>` suitable for
//! storing in the registry and sharing across the engine.
//!
//! A handler receives the spec's `args` payload and may be long-running;
//! the wrap window and playback loop await it to completion before moving
//! on.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ExecError;

/// Shared handle to a command handler.
pub type CommandRef = Arc<dyn Command>;

/// # Asynchronous, fallible command handler.
///
/// Implementors perform the action described by a spec's `args` and report
/// failure through [`ExecError`]; the engine routes failures into the
/// error-printer hook and never panics on them.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use macrovisor::{Command, ExecError};
/// use serde_json::Value;
///
/// struct Beep;
///
/// #[async_trait]
/// impl Command for Beep {
///     async fn run(&self, _args: Option<&Value>) -> Result<(), ExecError> {
///         // make a noise...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Command: Send + Sync + 'static {
    /// Executes the command with the spec's `args` payload.
    async fn run(&self, args: Option<&Value>) -> Result<(), ExecError>;
}

/// Function-backed command handler.
///
/// Wraps a closure that *creates* a new future per invocation, so repeated
/// dispatches never share hidden mutable state; share state explicitly via
/// `Arc` inside the closure if needed.
pub struct CommandFn<F> {
    f: F,
}

impl<F> CommandFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`CommandFn::arc`] when you immediately need a [`CommandRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Command for CommandFn<F>
where
    F: Fn(Option<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ExecError>> + Send + 'static,
{
    async fn run(&self, args: Option<&Value>) -> Result<(), ExecError> {
        (self.f)(args.cloned()).await
    }
}
