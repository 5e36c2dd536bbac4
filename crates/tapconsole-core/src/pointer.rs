#![forbid(unsafe_code)]

//! Normalized pointer events.
//!
//! Touch and mouse input reach the [`GestureController`](crate::GestureController)
//! as [`PointerEvent`]s. Touch events carry the touch identifier; mouse events
//! have no pointer id. Timestamps are monotonic offsets from an arbitrary host
//! epoch (e.g. `performance.now()`).

use std::time::Duration;

/// Input device family that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    Touch,
    Mouse,
}

/// A page-relative position in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

impl PagePoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for PagePoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEventKind {
    PressStart { position: PagePoint },
    PointerMove { position: PagePoint },
    PressEnd,
    PressCancel,
}

/// One normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Touch identifier; `None` for mouse input.
    pub pointer_id: Option<u32>,
    pub source: PointerSource,
    pub timestamp: Duration,
}

impl PointerEvent {
    #[must_use]
    pub fn press_start(
        source: PointerSource,
        pointer_id: Option<u32>,
        position: impl Into<PagePoint>,
        timestamp: Duration,
    ) -> Self {
        Self {
            kind: PointerEventKind::PressStart {
                position: position.into(),
            },
            pointer_id,
            source,
            timestamp,
        }
    }

    #[must_use]
    pub fn pointer_move(
        source: PointerSource,
        pointer_id: Option<u32>,
        position: impl Into<PagePoint>,
        timestamp: Duration,
    ) -> Self {
        Self {
            kind: PointerEventKind::PointerMove {
                position: position.into(),
            },
            pointer_id,
            source,
            timestamp,
        }
    }

    #[must_use]
    pub fn press_end(source: PointerSource, pointer_id: Option<u32>, timestamp: Duration) -> Self {
        Self {
            kind: PointerEventKind::PressEnd,
            pointer_id,
            source,
            timestamp,
        }
    }

    #[must_use]
    pub fn press_cancel(
        source: PointerSource,
        pointer_id: Option<u32>,
        timestamp: Duration,
    ) -> Self {
        Self {
            kind: PointerEventKind::PressCancel,
            pointer_id,
            source,
            timestamp,
        }
    }

    /// Position carried by the event, if any.
    #[must_use]
    pub fn position(&self) -> Option<PagePoint> {
        match self.kind {
            PointerEventKind::PressStart { position } | PointerEventKind::PointerMove { position } => {
                Some(position)
            }
            PointerEventKind::PressEnd | PointerEventKind::PressCancel => None,
        }
    }
}
