use thiserror::Error;

/// Errors from normalizing raw browser input JSON.
#[derive(Debug, Error)]
pub enum InputParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: f64 },
}

/// Errors from reading a page `error` / `unhandledrejection` event report.
#[derive(Debug, Error)]
pub enum ReportParseError {
    #[error("event report JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from reading overlay options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid option {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl OptionsError {
    #[must_use]
    pub fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}
