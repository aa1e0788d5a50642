//! # Command specification.
//!
//! [`CommandSpec`] is the normalized descriptor for one invokable action:
//! a non-empty command name, an opaque JSON `args` payload the engine never
//! interprets, an optional `await` token naming a condition to settle after
//! dispatch, and an optional `record` mode.
//!
//! ## Rules
//! - Raw input is shaped through [`CommandSpec::normalize`]; unrecognized
//!   properties are dropped.
//! - `await` and `record`, when present, must be strings — anything else
//!   rejects the whole spec (`None`), never partially salvages it.
//! - Structural equality (`PartialEq`) covers `{command, args, await,
//!   record}` with a deep compare of `args`; an absent field and a
//!   present-but-null field are not equal.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::WrapMode;

/// `record` value that excludes a spec from recording while still
/// executing it.
const RECORD_SIDE_EFFECT: &str = "side-effect";

/// Normalized descriptor for one invokable command.
///
/// ## Example
/// ```
/// use macrovisor::CommandSpec;
/// use serde_json::json;
///
/// let spec = CommandSpec::normalize(&json!({
///     "command": "editor.type",
///     "args": { "text": "a" },
///     "extra": "dropped",
/// }));
/// assert_eq!(spec.map(|s| s.command), Some("editor.type".to_string()));
///
/// // `await` must be a string or the whole spec is rejected.
/// assert!(CommandSpec::normalize(&json!({ "command": "x", "await": 1 })).is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// The command name; never empty.
    pub command: String,
    /// Opaque JSON payload handed to the handler as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
    /// Condition token the wrap window waits on after dispatch
    /// (e.g. a selection-change settle).
    #[serde(rename = "await", skip_serializing_if = "Option::is_none")]
    pub await_: Option<String>,
    /// Recording mode; `"side-effect"` executes without recording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
}

impl CommandSpec {
    /// Creates a spec with just a command name.
    pub fn named(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: None,
            await_: None,
            record: None,
        }
    }

    /// Validates and shapes a raw JSON value into a canonical spec.
    ///
    /// Returns `None` unless `raw` is an object with a non-empty string
    /// `command`. `args` is copied unchanged; `await`/`record` are copied
    /// only as strings, and any non-string presence rejects the spec.
    pub fn normalize(raw: &Value) -> Option<CommandSpec> {
        let obj = raw.as_object()?;
        let command = obj.get("command")?.as_str()?;
        if command.is_empty() {
            return None;
        }
        let await_ = match obj.get("await") {
            None => None,
            Some(v) => Some(v.as_str()?.to_string()),
        };
        let record = match obj.get("record") {
            None => None,
            Some(v) => Some(v.as_str()?.to_string()),
        };
        Some(CommandSpec {
            command: command.to_string(),
            args: obj.get("args").cloned(),
            await_,
            record,
        })
    }

    /// True if this spec is excluded from recording.
    pub fn is_side_effect(&self) -> bool {
        self.record.as_deref() == Some(RECORD_SIDE_EFFECT)
    }

    /// The wrap mode announced by the begin/end window notifications.
    pub fn wrap_mode(&self) -> WrapMode {
        if self.is_side_effect() {
            WrapMode::SideEffect
        } else {
            WrapMode::Command
        }
    }
}
