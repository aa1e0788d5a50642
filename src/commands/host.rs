//! # Host collaborator seams.
//!
//! The engine treats the surrounding editor as two narrow collaborators:
//!
//! - [`HostExecutor`] performs a named action the internal registry does
//!   not know. It fails for unknown names or handler-thrown errors.
//! - [`AwaitTracker`] observes the condition named by a spec's `await`
//!   token (e.g. a selection-change settle) so the wrap window can suspend
//!   until the editor has caught up with the command's effects.
//!
//! Both are trait objects injected at build time; the defaults make a
//! standalone engine usable in tests and demos.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ExecError;

/// External dispatch facility for commands the registry does not resolve.
#[async_trait]
pub trait HostExecutor: Send + Sync + 'static {
    /// Performs the named action with the given `args` payload.
    async fn dispatch(&self, command: &str, args: Option<&Value>) -> Result<(), ExecError>;
}

/// Observer for `await` condition tokens.
#[async_trait]
pub trait AwaitTracker: Send + Sync + 'static {
    /// Resolves once the named condition is observed.
    async fn wait_for(&self, condition: &str);
}

/// Default host: knows no commands, every dispatch fails.
pub struct NullHost;

#[async_trait]
impl HostExecutor for NullHost {
    async fn dispatch(&self, command: &str, _args: Option<&Value>) -> Result<(), ExecError> {
        Err(ExecError::UnknownCommand {
            command: command.to_string(),
        })
    }
}

/// Default await tracker: every condition is already settled.
pub struct SettledAwaits;

#[async_trait]
impl AwaitTracker for SettledAwaits {
    async fn wait_for(&self, _condition: &str) {}
}
