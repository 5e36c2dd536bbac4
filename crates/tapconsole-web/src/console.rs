#![forbid(unsafe_code)]

//! Console wrapping by composition.
//!
//! The host keeps its own `log` / `error` functions. [`ConsoleBridge`] pairs
//! that original sink with the overlay's sink and forwards every call to both,
//! original first, so page output still reaches the devtools console when
//! one is attached.

use tapconsole_core::{Value, debug};
use tapconsole_widgets::LogPanel;

/// Receiver of console calls.
pub trait ConsoleSink {
    /// A `console.log(...args)` call.
    fn log(&mut self, args: &[Value]);

    /// A `console.error(err)` call.
    fn error(&mut self, err: &Value);
}

impl<S: ConsoleSink + ?Sized> ConsoleSink for &mut S {
    fn log(&mut self, args: &[Value]) {
        (**self).log(args);
    }

    fn error(&mut self, err: &Value) {
        (**self).error(err);
    }
}

impl<S: ConsoleSink + ?Sized> ConsoleSink for Box<S> {
    fn log(&mut self, args: &[Value]) {
        (**self).log(args);
    }

    fn error(&mut self, err: &Value) {
        (**self).error(err);
    }
}

impl ConsoleSink for LogPanel {
    fn log(&mut self, args: &[Value]) {
        self.append_log(args.iter().cloned());
    }

    fn error(&mut self, err: &Value) {
        self.append_error(err.clone());
    }
}

/// Forwards console calls to the original sink, then to the target.
#[derive(Debug, Clone, Default)]
pub struct ConsoleBridge<O, T> {
    original: O,
    target: T,
}

impl<O: ConsoleSink, T: ConsoleSink> ConsoleBridge<O, T> {
    #[must_use]
    pub fn new(original: O, target: T) -> Self {
        Self { original, target }
    }

    #[must_use]
    pub fn original(&self) -> &O {
        &self.original
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Unwrap, giving back the original sink and the target.
    pub fn into_parts(self) -> (O, T) {
        (self.original, self.target)
    }
}

impl<O: ConsoleSink, T: ConsoleSink> ConsoleSink for ConsoleBridge<O, T> {
    fn log(&mut self, args: &[Value]) {
        debug!(args = args.len(), "console.log bridged");
        self.original.log(args);
        self.target.log(args);
    }

    fn error(&mut self, err: &Value) {
        debug!(kind = err.type_tag(), "console.error bridged");
        self.original.error(err);
        self.target.error(err);
    }
}

/// Sink that drops everything; stands in for a missing host console.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullConsole;

impl ConsoleSink for NullConsole {
    fn log(&mut self, _args: &[Value]) {}

    fn error(&mut self, _err: &Value) {}
}
