#![forbid(unsafe_code)]

//! Overlay options.
//!
//! Hosts configure the overlay with a JSON object; every field is optional.
//!
//! ```
//! use tapconsole_web::OverlayOptions;
//!
//! let options = OverlayOptions::from_json(r#"{"holdThresholdMs": 350, "guides": "ascii"}"#)?;
//! assert_eq!(options.gesture_config().hold_threshold.as_millis(), 350);
//! assert_eq!(options.panel_capacity, 1000);
//! # Ok::<(), tapconsole_web::OptionsError>(())
//! ```

use std::time::Duration;

use serde::Deserialize;
use tapconsole_core::{ControlSize, GestureConfig};
use tapconsole_widgets::{LogPanelConfig, RendererConfig, TreeGuides};

use crate::error::OptionsError;

/// Guide style name accepted in options JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideStyle {
    Ascii,
    #[default]
    Unicode,
    Rounded,
}

impl From<GuideStyle> for TreeGuides {
    fn from(style: GuideStyle) -> Self {
        match style {
            GuideStyle::Ascii => TreeGuides::Ascii,
            GuideStyle::Unicode => TreeGuides::Unicode,
            GuideStyle::Rounded => TreeGuides::Rounded,
        }
    }
}

/// Overlay configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OverlayOptions {
    /// Press duration that turns a tap into a drag (default: 500).
    pub hold_threshold_ms: u64,
    /// Window after a touch in which mouse presses are ignored (default: 400).
    pub ghost_click_window_ms: u64,
    /// Toggle control width in CSS pixels (default: 40).
    pub control_width: f64,
    /// Toggle control height in CSS pixels (default: 40).
    pub control_height: f64,
    /// Display width of container previews (default: 80).
    pub preview_width: usize,
    /// Maximum retained log entries (default: 1000).
    pub panel_capacity: usize,
    /// Delay before the control reappears after the panel closes (default: 1000).
    pub reveal_delay_ms: u64,
    pub guides: GuideStyle,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            hold_threshold_ms: 500,
            ghost_click_window_ms: 400,
            control_width: 40.0,
            control_height: 40.0,
            preview_width: 80,
            panel_capacity: 1000,
            reveal_delay_ms: 1000,
            guides: GuideStyle::default(),
        }
    }
}

impl OverlayOptions {
    /// Parse and validate options JSON.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject values the overlay cannot work with.
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (field, value) in [
            ("controlWidth", self.control_width),
            ("controlHeight", self.control_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptionsError::invalid(field, "must be a finite, non-negative size"));
            }
        }
        if self.panel_capacity == 0 {
            return Err(OptionsError::invalid("panelCapacity", "must be at least 1"));
        }
        if self.preview_width == 0 {
            return Err(OptionsError::invalid("previewWidth", "must be at least 1"));
        }
        Ok(())
    }

    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            hold_threshold: Duration::from_millis(self.hold_threshold_ms),
            ghost_click_window: Duration::from_millis(self.ghost_click_window_ms),
            control_size: ControlSize {
                width: self.control_width,
                height: self.control_height,
            },
        }
    }

    #[must_use]
    pub fn panel_config(&self) -> LogPanelConfig {
        LogPanelConfig {
            capacity: self.panel_capacity,
            renderer: RendererConfig {
                preview_width: self.preview_width,
                guides: self.guides.into(),
            },
        }
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}
