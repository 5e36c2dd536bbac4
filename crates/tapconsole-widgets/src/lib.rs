#![forbid(unsafe_code)]

//! Inspector and log panel for Tapconsole.
//!
//! # Role in Tapconsole
//! `tapconsole-widgets` turns logged [`Value`](tapconsole_core::Value)s into
//! expandable [`DisplayNode`] trees and keeps them in the [`LogPanel`]. It has
//! no host dependencies: the text forms produced here ([`ValueRenderer::lines`],
//! [`LogPanel::render_lines`]) are what a host draws, or what tests compare.

pub mod guides;
pub mod inspector;
pub mod log_panel;
pub mod preview;

pub use guides::TreeGuides;
pub use inspector::{DisplayNode, RendererConfig, ValueRenderer};
pub use log_panel::{EntryId, LogEntry, LogPanel, LogPanelConfig, Severity};
pub use preview::{
    CIRCULAR, PreviewError, UNSERIALIZABLE, format_number, preview, to_json, to_json_text,
};
