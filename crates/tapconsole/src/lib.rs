#![forbid(unsafe_code)]

//! Tapconsole public facade crate.
//!
//! An in-page diagnostic overlay for touch devices: a draggable toggle
//! control that opens a log panel, with an inspector that expands logged
//! arrays and objects on demand.
//!
//! This crate re-exports the common types of the internal crates and offers
//! a small prelude.
//!
//! ```
//! use tapconsole::prelude::*;
//!
//! let mut panel = LogPanel::default();
//! let id = panel.append_log([Value::from("ready"), Value::array([10, 20])]);
//! assert_eq!(panel.toggle(id, 1, &[]), Some(true));
//! assert_eq!(panel.render_lines().len(), 4);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tapconsole_core::{
    ArrayRef, Attribute, AttributeSet, AttributeSource, ControlSize, DescribeError, GestureConfig,
    GestureController, GestureDispatch, GestureIgnoredReason, GestureIntent, GestureOutcome,
    GestureState, HoldToken, HostRequest, ObjectRef, OpaqueValue, PagePoint, PointerEvent,
    PointerEventKind, PointerSource, Value, ValueId, ValueKind, classify,
};

// --- Widget re-exports -----------------------------------------------------

pub use tapconsole_widgets::{
    DisplayNode, EntryId, LogEntry, LogPanel, LogPanelConfig, PreviewError, RendererConfig,
    Severity, TreeGuides, ValueRenderer,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use tapconsole_web::{
    ConsoleBridge, ConsoleSink, ErrorEvent, InputParseError, OptionsError, Overlay, OverlayHost,
    OverlayOptions, RejectionEvent, ReportParseError, parse_pointer_input,
};

#[cfg(feature = "tracing-json")]
pub use tapconsole_core::logging::init_json_logging;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Tapconsole hosts.
#[derive(Debug)]
pub enum Error {
    /// Raw pointer input JSON could not be read.
    #[cfg(feature = "web")]
    Input(InputParseError),
    /// A page error or rejection report could not be read.
    #[cfg(feature = "web")]
    Report(ReportParseError),
    /// Overlay options were rejected.
    #[cfg(feature = "web")]
    Options(OptionsError),
    /// A value could not be serialized for preview.
    Preview(PreviewError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "web")]
            Self::Input(err) => write!(f, "{err}"),
            #[cfg(feature = "web")]
            Self::Report(err) => write!(f, "{err}"),
            #[cfg(feature = "web")]
            Self::Options(err) => write!(f, "{err}"),
            Self::Preview(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "web")]
            Self::Input(err) => Some(err),
            #[cfg(feature = "web")]
            Self::Report(err) => Some(err),
            #[cfg(feature = "web")]
            Self::Options(err) => Some(err),
            Self::Preview(err) => Some(err),
        }
    }
}

#[cfg(feature = "web")]
impl From<InputParseError> for Error {
    fn from(err: InputParseError) -> Self {
        Self::Input(err)
    }
}

#[cfg(feature = "web")]
impl From<ReportParseError> for Error {
    fn from(err: ReportParseError) -> Self {
        Self::Report(err)
    }
}

#[cfg(feature = "web")]
impl From<OptionsError> for Error {
    fn from(err: OptionsError) -> Self {
        Self::Options(err)
    }
}

impl From<PreviewError> for Error {
    fn from(err: PreviewError) -> Self {
        Self::Preview(err)
    }
}

/// Standard result type for Tapconsole APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DisplayNode, Error, GestureController, GestureIntent, LogPanel, PointerEvent,
        PointerSource, Result, Value, ValueKind, ValueRenderer,
    };

    #[cfg(feature = "web")]
    pub use crate::{ConsoleBridge, ConsoleSink, Overlay, OverlayHost, OverlayOptions};

    pub use crate::{core, widgets};

    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use tapconsole_core as core;
pub use tapconsole_widgets as widgets;
#[cfg(feature = "web")]
pub use tapconsole_web as web;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_errors_convert() {
        let cyclic = ObjectRef::new();
        cyclic.set("self", Value::from(cyclic.clone()));
        let err: Error = tapconsole_widgets::to_json(&Value::from(cyclic))
            .map(|_| ())
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Preview(PreviewError::Circular { .. })));
    }

    #[cfg(feature = "web")]
    #[test]
    fn options_errors_convert() {
        let err: Error = OverlayOptions::from_json(r#"{"panelCapacity":0}"#)
            .unwrap_err()
            .into();
        assert_eq!(err.to_string(), "invalid option panelCapacity: must be at least 1");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[cfg(feature = "web")]
    #[test]
    fn report_errors_convert() {
        let mut overlay = Overlay::with_defaults(NullHost);
        let err: Error = overlay.report_rejection_json("{").unwrap_err().into();
        assert!(matches!(err, Error::Report(ReportParseError::Json(_))));
        assert!(err.to_string().starts_with("event report JSON error"));
        assert!(overlay.panel().is_empty());
    }

    #[cfg(feature = "web")]
    struct NullHost;

    #[cfg(feature = "web")]
    impl OverlayHost for NullHost {
        fn on_activate(&mut self) {}

        fn on_reposition(&mut self, _x: f64, _y: f64) {}

        fn schedule_hold_timer(&mut self, _token: HoldToken, _delay: std::time::Duration) {}

        fn set_surface_listener(&mut self, _attached: bool) {}
    }
}
