//! # Internal command registry.
//!
//! Maps a command name to a local handler. The registry is checked first
//! on every dispatch; names it does not know are delegated to the host
//! executor.
//!
//! ## Rules
//! - `register` is an idempotent overwrite: the last handler wins.
//! - Handlers are held as shared [`CommandRef`]s; `resolve` clones the
//!   handle out so dispatch never runs under the registry lock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::commands::CommandRef;

/// Name-keyed map of internal command handlers.
pub(crate) struct Registry {
    commands: Mutex<HashMap<String, CommandRef>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            commands: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CommandRef>> {
        self.commands.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a handler, overwriting any previous one for the name.
    pub(crate) fn register(&self, name: impl Into<String>, handler: CommandRef) {
        self.lock().insert(name.into(), handler);
    }

    /// Returns the handler for the name, if registered.
    pub(crate) fn resolve(&self, name: &str) -> Option<CommandRef> {
        self.lock().get(name).cloned()
    }
}
