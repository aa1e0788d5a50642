//! Command handlers, the internal registry, and the host-executor seam.

mod command;
mod host;
mod registry;

pub use command::{Command, CommandFn, CommandRef};
pub use host::{AwaitTracker, HostExecutor, NullHost, SettledAwaits};
pub(crate) use registry::Registry;
