#![forbid(unsafe_code)]

//! Raw browser input normalization.
//!
//! [`parse_pointer_input`] accepts the JSON a host serializes from a DOM
//! `TouchEvent` or `MouseEvent` and returns the [`PointerEvent`]s the
//! [`GestureController`](tapconsole_core::GestureController) consumes.
//!
//! # Accepted shapes
//!
//! ```json
//! {"type": "touchstart", "timeStamp": 1532.5,
//!  "changedTouches": [{"identifier": 0, "pageX": 120, "pageY": 480}]}
//! {"type": "mousedown", "timeStamp": 1532.5, "button": 0, "pageX": 120, "pageY": 480}
//! ```
//!
//! - `touchstart`, `touchmove`, `touchend`, `touchcancel`: one event per entry
//!   of `changedTouches`, pointer id = `identifier`. Start and move entries
//!   need `pageX`/`pageY`. An entry missing its fields is dropped on its own;
//!   the rest of the batch still yields events.
//! - `mousedown`, `mousemove`, `mouseup`: primary button only, no pointer id.
//! - Any other `type` yields no events.
//!
//! `timeStamp` is in milliseconds, as DOM events report it.

use std::time::Duration;

use serde::Deserialize;
use tapconsole_core::{PagePoint, PointerEvent, PointerSource, debug};

use crate::error::InputParseError;

/// Primary mouse button in DOM numbering.
const PRIMARY_BUTTON: i32 = 0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInput {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    time_stamp: Option<f64>,
    #[serde(default)]
    changed_touches: Option<Vec<RawTouch>>,
    #[serde(default)]
    button: Option<i32>,
    #[serde(default)]
    page_x: Option<f64>,
    #[serde(default)]
    page_y: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTouch {
    #[serde(default)]
    identifier: Option<u32>,
    #[serde(default)]
    page_x: Option<f64>,
    #[serde(default)]
    page_y: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Start,
    Move,
    End,
    Cancel,
}

/// Normalize one raw input event.
///
/// Returns an empty list for event types and buttons the overlay does not
/// handle, and `Err` for malformed JSON or missing required fields. Malformed
/// `changedTouches` entries are skipped individually.
pub fn parse_pointer_input(json: &str) -> Result<Vec<PointerEvent>, InputParseError> {
    let raw: RawInput = serde_json::from_str(json)?;

    let (source, phase) = match raw.event_type.as_str() {
        "touchstart" => (PointerSource::Touch, Phase::Start),
        "touchmove" => (PointerSource::Touch, Phase::Move),
        "touchend" => (PointerSource::Touch, Phase::End),
        "touchcancel" => (PointerSource::Touch, Phase::Cancel),
        "mousedown" => (PointerSource::Mouse, Phase::Start),
        "mousemove" => (PointerSource::Mouse, Phase::Move),
        "mouseup" => (PointerSource::Mouse, Phase::End),
        _ => return Ok(Vec::new()),
    };
    let timestamp = parse_timestamp(raw.time_stamp)?;

    match source {
        PointerSource::Touch => {
            let touches = raw
                .changed_touches
                .as_deref()
                .ok_or(InputParseError::MissingField {
                    field: "changedTouches",
                })?;
            let events = touches
                .iter()
                .enumerate()
                .filter_map(|(index, touch)| {
                    let parsed = touch
                        .identifier
                        .ok_or(InputParseError::MissingField {
                            field: "identifier",
                        })
                        .and_then(|id| {
                            event_for(phase, source, Some(id), touch.page_x, touch.page_y, timestamp)
                        });
                    match parsed {
                        Ok(event) => Some(event),
                        Err(err) => {
                            debug!(index, error = %err, "malformed touch entry dropped");
                            None
                        }
                    }
                })
                .collect();
            Ok(events)
        }
        PointerSource::Mouse => {
            // Moves report the button of the last press; only presses filter.
            let is_press = matches!(phase, Phase::Start | Phase::End);
            if is_press && raw.button.unwrap_or(PRIMARY_BUTTON) != PRIMARY_BUTTON {
                return Ok(Vec::new());
            }
            let event = event_for(phase, source, None, raw.page_x, raw.page_y, timestamp)?;
            Ok(vec![event])
        }
    }
}

fn parse_timestamp(value: Option<f64>) -> Result<Duration, InputParseError> {
    let millis = value.ok_or(InputParseError::MissingField { field: "timeStamp" })?;
    let nanos = (millis * 1_000_000.0).round();
    if !nanos.is_finite() || nanos < 0.0 || nanos >= u64::MAX as f64 {
        return Err(InputParseError::InvalidTimestamp { value: millis });
    }
    Ok(Duration::from_nanos(nanos as u64))
}

fn event_for(
    phase: Phase,
    source: PointerSource,
    pointer_id: Option<u32>,
    page_x: Option<f64>,
    page_y: Option<f64>,
    timestamp: Duration,
) -> Result<PointerEvent, InputParseError> {
    Ok(match phase {
        Phase::Start => {
            PointerEvent::press_start(source, pointer_id, position(page_x, page_y)?, timestamp)
        }
        Phase::Move => {
            PointerEvent::pointer_move(source, pointer_id, position(page_x, page_y)?, timestamp)
        }
        Phase::End => PointerEvent::press_end(source, pointer_id, timestamp),
        Phase::Cancel => PointerEvent::press_cancel(source, pointer_id, timestamp),
    })
}

fn position(page_x: Option<f64>, page_y: Option<f64>) -> Result<PagePoint, InputParseError> {
    let x = page_x.ok_or(InputParseError::MissingField { field: "pageX" })?;
    let y = page_y.ok_or(InputParseError::MissingField { field: "pageY" })?;
    Ok(PagePoint::new(x, y))
}
