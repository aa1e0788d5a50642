//! Error types used by command dispatch and playback.
//!
//! The engine never lets a failure escape to its caller: every public
//! operation settles normally, and execution failures travel through the
//! injectable error-printer hook instead. [`ExecError`] is the one error
//! type that crosses the dispatch seam (registry handlers, the host
//! executor) before it is routed into that hook.

use thiserror::Error;

/// # Errors produced by command execution.
///
/// Raised when a dispatched command cannot be resolved or its handler
/// reports a failure. These are surfaced exactly once through the
/// error-printer hook; they truncate the current playback or wrap chain
/// at the failing entry and are never propagated to the original caller.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// No handler is registered for the command name, neither in the
    /// internal registry nor in the host executor.
    #[error("unknown command: {command}")]
    UnknownCommand {
        /// The unresolved command name.
        command: String,
    },

    /// The command was resolved but its handler reported a failure.
    #[error("command '{command}' failed: {error}")]
    Failed {
        /// The command name.
        command: String,
        /// The underlying error message.
        error: String,
    },
}

impl ExecError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use macrovisor::ExecError;
    ///
    /// let err = ExecError::UnknownCommand { command: "editor.type".into() };
    /// assert_eq!(err.as_label(), "exec_unknown_command");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ExecError::UnknownCommand { .. } => "exec_unknown_command",
            ExecError::Failed { .. } => "exec_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ExecError::UnknownCommand { command } => format!("unknown command: {command}"),
            ExecError::Failed { command, error } => format!("{command}: {error}"),
        }
    }

    /// Shorthand for a handler failure with the given command name.
    pub fn failed(command: impl Into<String>, error: impl Into<String>) -> Self {
        ExecError::Failed {
            command: command.into(),
            error: error.into(),
        }
    }
}
