#![forbid(unsafe_code)]

//! Reports for unhandled errors and promise rejections.
//!
//! The host forwards the page's `error` and `unhandledrejection` events as
//! JSON. Each becomes a one-line JSON report that is appended to the panel as
//! an error entry. A missing event (the host passed `null`) still produces a
//! report, carrying the fallback message.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// `code` of reports built from `error` events.
pub const UNHANDLED_ERROR_CODE: &str = "Unhandled Error Exception";
/// `code` of reports built from `unhandledrejection` events.
pub const UNHANDLED_REJECTION_CODE: &str = "Unhandled Promise Rejection";
/// Message used when the event or its reason is missing.
pub const MISSING_EVENT_MESSAGE: &str = "Error event is null or undefined.";
/// Stack used when the rejection reason has no stack.
pub const MISSING_STACK_MESSAGE: &str = "Error stack is null or undefined.";

/// A page `error` event, as serialized by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ErrorEvent {
    pub message: Option<String>,
    /// The thrown value, if the host could serialize it.
    pub error: Option<Json>,
    pub filename: Option<String>,
    pub lineno: Option<u32>,
    pub colno: Option<u32>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

/// A page `unhandledrejection` event, as serialized by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RejectionEvent {
    /// The rejection reason.
    pub reason: Option<Json>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lineno: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    colno: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    event_type: Option<&'a str>,
    code: &'static str,
}

#[derive(Serialize)]
struct RejectionReport<'a> {
    code: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    event_type: Option<&'a str>,
}

/// JSON report for an unhandled error event.
#[must_use]
pub fn error_report(event: Option<&ErrorEvent>) -> String {
    let report = match event {
        Some(event) => ErrorReport {
            error: event.error.as_ref(),
            stack: event.error.as_ref().and_then(|e| string_field(e, "stack")),
            source: event.filename.as_deref(),
            lineno: event.lineno,
            colno: event.colno,
            event_type: event.event_type.as_deref(),
            code: UNHANDLED_ERROR_CODE,
        },
        None => ErrorReport {
            error: None,
            stack: None,
            source: None,
            lineno: None,
            colno: None,
            event_type: None,
            code: UNHANDLED_ERROR_CODE,
        },
    };
    to_line(&report, UNHANDLED_ERROR_CODE)
}

/// JSON report for an unhandled promise rejection.
#[must_use]
pub fn rejection_report(event: Option<&RejectionEvent>) -> String {
    let report = match event {
        Some(event) => {
            let reason = event.reason.as_ref();
            RejectionReport {
                code: UNHANDLED_REJECTION_CODE,
                message: reason
                    .and_then(|r| string_field(r, "message"))
                    .unwrap_or(MISSING_EVENT_MESSAGE),
                stack: Some(
                    reason
                        .and_then(|r| string_field(r, "stack"))
                        .unwrap_or(MISSING_STACK_MESSAGE),
                ),
                event_type: event.event_type.as_deref(),
            }
        }
        None => RejectionReport {
            code: UNHANDLED_REJECTION_CODE,
            message: MISSING_EVENT_MESSAGE,
            stack: None,
            event_type: None,
        },
    };
    to_line(&report, UNHANDLED_REJECTION_CODE)
}

// Empty strings count as missing, as a truthiness check would.
fn string_field<'a>(value: &'a Json, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Json::as_str)
        .filter(|s| !s.is_empty())
}

fn to_line<T: Serialize>(report: &T, code: &str) -> String {
    serde_json::to_string(report).unwrap_or_else(|_| format!(r#"{{"code":"{code}"}}"#))
}
