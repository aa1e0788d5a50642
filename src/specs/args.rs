//! # Playback-argument validation.
//!
//! Shapes a raw JSON value into [`PlaybackArgs`], the `{repeat, sequence}`
//! pair the playback engine consumes. Validation recovers locally from
//! anything malformed: the worst outcome is an empty default, never an
//! error to the caller.
//!
//! ## Rules
//! - Non-object input (arrays and primitives included) yields the empty
//!   default, silently.
//! - `repeat` is kept only when it is already a non-negative integer
//!   number; otherwise it is dropped without a diagnostic.
//! - A `sequence` that is not an array of normalizable specs is replaced
//!   with `[]`, and one diagnostic naming the offending literal
//!   (JSON-rendered) goes through the message sink. This is the **only**
//!   malformed field that earns a diagnostic.
//! - Already-valid input is a fixed point.

use serde_json::Value;

use crate::hooks::MessageSink;
use crate::specs::CommandSpec;

/// Validated arguments for playback.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackArgs {
    /// Number of repetitions; `None` means the default of 1.
    pub repeat: Option<u64>,
    /// Explicit sequence to replay; `None` means the recorded one.
    pub sequence: Option<Vec<CommandSpec>>,
}

impl PlaybackArgs {
    /// Args that repeat the recorded sequence `n` times.
    pub fn repeat(n: u64) -> Self {
        Self {
            repeat: Some(n),
            sequence: None,
        }
    }
}

/// Validates raw playback arguments, recovering from malformed input.
///
/// See the module docs for the exact recovery rules. `messages` receives
/// the single diagnostic emitted for a malformed `sequence`.
pub fn validate_playback_args(raw: Option<&Value>, messages: &dyn MessageSink) -> PlaybackArgs {
    let mut out = PlaybackArgs::default();
    let Some(Value::Object(map)) = raw else {
        return out;
    };
    if let Some(repeat) = map.get("repeat") {
        if let Some(n) = repeat.as_u64() {
            out.repeat = Some(n);
        }
    }
    if let Some(sequence) = map.get("sequence") {
        match normalize_sequence(sequence) {
            Some(specs) => out.sequence = Some(specs),
            None => {
                let literal =
                    serde_json::to_string(sequence).unwrap_or_else(|_| "null".to_string());
                messages.show(&format!("Invalid 'sequence' argument: {literal}"));
                out.sequence = Some(Vec::new());
            }
        }
    }
    out
}

fn normalize_sequence(raw: &Value) -> Option<Vec<CommandSpec>> {
    raw.as_array()?
        .iter()
        .map(CommandSpec::normalize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct Capture(Arc<Mutex<Vec<String>>>);

    impl MessageSink for Capture {
        fn show(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    fn capture() -> (Capture, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Capture(log.clone()), log)
    }

    #[test]
    fn test_non_object_input_yields_empty_default() {
        let (sink, log) = capture();
        assert_eq!(validate_playback_args(None, &sink), PlaybackArgs::default());
        for raw in [json!({}), json!([]), json!(""), json!(123), json!(null)] {
            assert_eq!(
                validate_playback_args(Some(&raw), &sink),
                PlaybackArgs::default()
            );
        }
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_properties_are_dropped() {
        let (sink, log) = capture();
        let raw = json!({ "hello": 5 });
        assert_eq!(
            validate_playback_args(Some(&raw), &sink),
            PlaybackArgs::default()
        );
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_repeat_kept_only_when_already_a_number() {
        let (sink, _) = capture();
        let raw = json!({ "repeat": 5 });
        assert_eq!(
            validate_playback_args(Some(&raw), &sink).repeat,
            Some(5)
        );
        let raw = json!({ "repeat": 0 });
        assert_eq!(
            validate_playback_args(Some(&raw), &sink).repeat,
            Some(0)
        );
        // Dropped without diagnostic: strings and negatives.
        let raw = json!({ "repeat": "123" });
        assert_eq!(validate_playback_args(Some(&raw), &sink).repeat, None);
        let raw = json!({ "repeat": -1 });
        assert_eq!(validate_playback_args(Some(&raw), &sink).repeat, None);
    }

    #[test]
    fn test_valid_sequence_is_a_fixed_point() {
        let (sink, log) = capture();
        let raw = json!({ "sequence": [] });
        assert_eq!(
            validate_playback_args(Some(&raw), &sink).sequence,
            Some(vec![])
        );
        let raw = json!({ "sequence": [
            { "command": "foo" },
            { "command": "bar", "args": "baz" },
        ] });
        let args = validate_playback_args(Some(&raw), &sink);
        assert_eq!(
            args.sequence,
            Some(vec![
                CommandSpec::normalize(&json!({ "command": "foo" })).unwrap(),
                CommandSpec::normalize(&json!({ "command": "bar", "args": "baz" })).unwrap(),
            ])
        );
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_sequence_becomes_empty_with_diagnostic() {
        let (sink, log) = capture();
        let raw = json!({ "sequence": "123" });
        assert_eq!(
            validate_playback_args(Some(&raw), &sink).sequence,
            Some(vec![])
        );
        assert_eq!(
            *log.lock().unwrap(),
            vec!["Invalid 'sequence' argument: \"123\"".to_string()]
        );

        log.lock().unwrap().clear();
        let raw = json!({ "sequence": [3, 4] });
        assert_eq!(
            validate_playback_args(Some(&raw), &sink).sequence,
            Some(vec![])
        );
        assert_eq!(
            *log.lock().unwrap(),
            vec!["Invalid 'sequence' argument: [3,4]".to_string()]
        );

        log.lock().unwrap().clear();
        let raw = json!({ "sequence": [
            { "command": "valid" },
            { "COMMAND": "invalid" },
        ] });
        assert_eq!(
            validate_playback_args(Some(&raw), &sink).sequence,
            Some(vec![])
        );
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "Invalid 'sequence' argument: [{\"command\":\"valid\"},{\"COMMAND\":\"invalid\"}]"
                    .to_string()
            ]
        );
    }
}
