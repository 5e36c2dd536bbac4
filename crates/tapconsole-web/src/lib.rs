#![forbid(unsafe_code)]

//! `tapconsole-web` adapts the Tapconsole core to a browser host.
//!
//! Design goals:
//! - **Host-driven I/O**: the page pushes raw input JSON, timer firings and
//!   the current time; nothing here touches the DOM.
//! - **Deterministic time**: every timestamp comes from the host.
//! - **No globals**: one [`Overlay`] value per overlay.
//!
//! The host draws the control and the panel. This crate owns their state and
//! decides what happens on each event.

pub mod console;
pub mod error;
pub mod input;
pub mod options;
pub mod overlay;
pub mod report;

pub use console::{ConsoleBridge, ConsoleSink, NullConsole};
pub use error::{InputParseError, OptionsError, ReportParseError};
pub use input::parse_pointer_input;
pub use options::{GuideStyle, OverlayOptions};
pub use overlay::{Overlay, OverlayHost};
pub use report::{
    ErrorEvent, MISSING_EVENT_MESSAGE, MISSING_STACK_MESSAGE, RejectionEvent,
    UNHANDLED_ERROR_CODE, UNHANDLED_REJECTION_CODE, error_report, rejection_report,
};
