#![forbid(unsafe_code)]

//! Core: value model, classification, and pointer gesture recognition.
//!
//! # Role in Tapconsole
//! `tapconsole-core` is the leaf layer. It owns the runtime [`Value`] model the
//! host hands to the overlay, the total [`ValueKind`] classification, the
//! attribute sources used when inspecting objects, and the
//! [`GestureController`] that turns raw pointer input into tap / drag intents.
//!
//! # Primary responsibilities
//! - **Value**: shared, identity-bearing arrays and objects with prototypes.
//! - **ValueKind**: closed classification, total over every value.
//! - **AttributeSet**: own and inherited attributes, each sorted by key.
//! - **GestureController**: press / hold / drag / release state machine.
//!
//! # How it fits in the system
//! `tapconsole-widgets` renders values into display trees and keeps the log
//! panel; `tapconsole-web` normalizes browser input into [`PointerEvent`]s and
//! applies the intents produced here.

pub mod attributes;
pub mod gesture;
pub mod kind;
pub mod logging;
pub mod pointer;
pub mod value;

pub use attributes::{Attribute, AttributeSet, AttributeSource, PrototypeRow, compare_keys};
pub use gesture::{
    ControlSize, GestureConfig, GestureController, GestureDispatch, GestureIgnoredReason,
    GestureIntent, GestureLogEntry, GestureOutcome, GesturePhase, GestureState, HoldToken,
    HostRequest,
};
pub use kind::{ValueKind, classify};
pub use pointer::{PagePoint, PointerEvent, PointerEventKind, PointerSource};
pub use value::{
    ArrayRef, DescribeError, ElementValue, FunctionValue, ObjectRef, OpaqueValue, Property, Value,
    ValueId,
};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
