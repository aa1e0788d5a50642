//! # Keybinding export formatting.
//!
//! Renders a recorded sequence as a keybinding entry the host editor can
//! paste into its keybindings file: a fixed four-space-indented frame with
//! one single-line spec per row.
//!
//! ```text
//! {
//!     "key": "",
//!     "command": "macrovisor.playback",
//!     "args": {
//!         "sequence": [
//!             { "command": "cursorRight" },
//!             { "command": "type", "args": { "text": "a" } }
//!         ]
//!     }
//! }
//! ```
//!
//! The per-spec rows are laid out by hand rather than through a pretty
//! printer: field values are compact JSON, the object frame is spaced.

use serde_json::Value;

use crate::specs::CommandSpec;

/// Renders the full keybinding JSON for the sequence.
pub(crate) fn keybinding_json(sequence: &[CommandSpec], playback_command: &str) -> String {
    let mut out = String::new();
    out.push_str("{\n");
    out.push_str("    \"key\": \"\",\n");
    out.push_str(&format!(
        "    \"command\": {},\n",
        Value::from(playback_command)
    ));
    out.push_str("    \"args\": {\n");
    out.push_str("        \"sequence\": [\n");
    for (index, spec) in sequence.iter().enumerate() {
        out.push_str("            ");
        out.push_str(&spec_line(spec));
        if index + 1 < sequence.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("        ]\n");
    out.push_str("    }\n");
    out.push('}');
    out
}

/// One spec as a single spaced line, fields in canonical order.
fn spec_line(spec: &CommandSpec) -> String {
    let mut fields = vec![format!("\"command\": {}", Value::from(spec.command.as_str()))];
    if let Some(args) = &spec.args {
        fields.push(format!("\"args\": {args}"));
    }
    if let Some(await_) = &spec.await_ {
        fields.push(format!("\"await\": {}", Value::from(await_.as_str())));
    }
    if let Some(record) = &spec.record {
        fields.push(format!("\"record\": {}", Value::from(record.as_str())));
    }
    format!("{{ {} }}", fields.join(", "))
}
