//! # Injectable hooks for the surrounding editor surface.
//!
//! The engine talks to its UI surface through four narrow seams: a message
//! line, an input-box prompt, an error printer, and a clipboard sink. Each
//! hook is a trait object held in a swappable slot; the setters follow the
//! scoped override/restore pattern and **return the previous value** so a
//! caller can install a replacement, do its work, and put the original
//! back:
//!
//! ```text
//! let old = hooks.set_show_message(capture);
//! ...            // run with the override in place
//! hooks.set_show_message(old);
//! ```
//!
//! The defaults are plain stdout/stderr writers suitable for development
//! and demos; a real host installs its own implementations.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::ExecError;

/// Displays a one-line informational message to the user.
pub trait MessageSink: Send + Sync + 'static {
    /// Shows the message. Must not block.
    fn show(&self, text: &str);
}

/// Prints an execution error to the user-visible error channel.
pub trait ErrorPrinter: Send + Sync + 'static {
    /// Prints the error. Must not block.
    fn print(&self, err: &ExecError);
}

/// Prompts the user for a line of input.
#[async_trait]
pub trait InputPrompt: Send + Sync + 'static {
    /// Shows the prompt and resolves with the entered text, or `None` if
    /// the user dismissed it.
    async fn read(&self, prompt: &str) -> Option<String>;
}

/// Receives exported text (the keybinding JSON) for the host clipboard.
#[async_trait]
pub trait ClipboardSink: Send + Sync + 'static {
    /// Writes the text to the clipboard.
    async fn write(&self, text: &str);
}

/// Default message sink: human-readable lines on stdout.
pub struct StdoutMessages;

impl MessageSink for StdoutMessages {
    fn show(&self, text: &str) {
        println!("[message] {text}");
    }
}

/// Default error printer: human-readable lines on stderr.
pub struct StderrErrors;

impl ErrorPrinter for StderrErrors {
    fn print(&self, err: &ExecError) {
        eprintln!("[error] {}", err.as_message());
    }
}

/// Default input prompt: always dismissed.
pub struct NullPrompt;

#[async_trait]
impl InputPrompt for NullPrompt {
    async fn read(&self, _prompt: &str) -> Option<String> {
        None
    }
}

/// Default clipboard sink: discards the text.
pub struct NullClipboard;

#[async_trait]
impl ClipboardSink for NullClipboard {
    async fn write(&self, _text: &str) {}
}

/// The engine's hook slots.
///
/// Each setter swaps in the new implementation and hands back the previous
/// one. Reads clone the current `Arc` out of the slot, so a hook installed
/// mid-operation applies from the next call site on.
pub struct Hooks {
    messages: Mutex<Arc<dyn MessageSink>>,
    errors: Mutex<Arc<dyn ErrorPrinter>>,
    input: Mutex<Arc<dyn InputPrompt>>,
    clipboard: Mutex<Arc<dyn ClipboardSink>>,
}

fn slot<T: ?Sized>(m: &Mutex<Arc<T>>) -> MutexGuard<'_, Arc<T>> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Hooks {
    pub(crate) fn new() -> Self {
        Self {
            messages: Mutex::new(Arc::new(StdoutMessages)),
            errors: Mutex::new(Arc::new(StderrErrors)),
            input: Mutex::new(Arc::new(NullPrompt)),
            clipboard: Mutex::new(Arc::new(NullClipboard)),
        }
    }

    /// Installs a message sink, returning the previous one.
    pub fn set_show_message(&self, sink: Arc<dyn MessageSink>) -> Arc<dyn MessageSink> {
        std::mem::replace(&mut *slot(&self.messages), sink)
    }

    /// Installs an error printer, returning the previous one.
    pub fn set_print_error(&self, printer: Arc<dyn ErrorPrinter>) -> Arc<dyn ErrorPrinter> {
        std::mem::replace(&mut *slot(&self.errors), printer)
    }

    /// Installs an input prompt, returning the previous one.
    pub fn set_show_input_box(&self, prompt: Arc<dyn InputPrompt>) -> Arc<dyn InputPrompt> {
        std::mem::replace(&mut *slot(&self.input), prompt)
    }

    /// Installs a clipboard sink, returning the previous one.
    pub fn set_clipboard(&self, sink: Arc<dyn ClipboardSink>) -> Arc<dyn ClipboardSink> {
        std::mem::replace(&mut *slot(&self.clipboard), sink)
    }

    /// Returns the current message sink.
    pub fn messages(&self) -> Arc<dyn MessageSink> {
        slot(&self.messages).clone()
    }

    pub(crate) fn show_message(&self, text: &str) {
        self.messages().show(text);
    }

    pub(crate) fn print_error(&self, err: &ExecError) {
        slot(&self.errors).clone().print(err);
    }

    pub(crate) async fn read_input(&self, prompt: &str) -> Option<String> {
        let input = slot(&self.input).clone();
        input.read(prompt).await
    }

    pub(crate) async fn write_clipboard(&self, text: &str) {
        let clipboard = slot(&self.clipboard).clone();
        clipboard.write(text).await;
    }
}
