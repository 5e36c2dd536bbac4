#![forbid(unsafe_code)]

//! One-line text forms of values.
//!
//! Containers are previewed as JSON ([`to_json`]) with the usual
//! `JSON.stringify` rules: `undefined` and functions are dropped from objects
//! and become `null` in arrays, non-finite numbers become `null`, elements
//! serialize as `{}`, and host objects serialize as their description.
//! Serialization fails on cycles and on host objects that cannot describe
//! themselves; [`preview`] degrades those failures to [`UNSERIALIZABLE`].

use std::{fmt, io};

use ahash::AHashSet;
use serde_json::ser::Formatter;
use serde_json::{Map, Number, Serializer, Value as Json};
use tapconsole_core::{DescribeError, Value, ValueId};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Placeholder shown when a value cannot be turned into text.
pub const UNSERIALIZABLE: &str = "[unserializable]";

/// Marker shown instead of a value already open further up the tree.
pub const CIRCULAR: &str = "[Circular]";

const ELLIPSIS: &str = "\u{2026}";

/// Largest magnitude at which integral numbers still print without exponent.
const PLAIN_INTEGER_LIMIT: f64 = 1e21;

/// Largest integer an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Why a value could not be serialized.
#[derive(Debug)]
pub enum PreviewError {
    /// The value graph refers back to a container being serialized.
    Circular { id: ValueId },
    /// A host object failed to describe itself.
    Describe(DescribeError),
    Json(serde_json::Error),
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Circular { id } => write!(f, "circular structure at {id:?}"),
            Self::Describe(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "json serialization failed: {err}"),
        }
    }
}

impl std::error::Error for PreviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Circular { .. } => None,
            Self::Describe(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<DescribeError> for PreviewError {
    fn from(err: DescribeError) -> Self {
        Self::Describe(err)
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Convert a value to JSON. A top-level `undefined` or function becomes `null`.
pub fn to_json(value: &Value) -> Result<Json, PreviewError> {
    let mut open = AHashSet::new();
    Ok(json_of(value, &mut open)?.unwrap_or(Json::Null))
}

/// Compact JSON text for a value, with numbers written by [`format_number`].
pub fn to_json_text(value: &Value) -> Result<String, PreviewError> {
    let json = to_json(value)?;
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, ScriptNumbers);
    serde::Serialize::serialize(&json, &mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Compact formatter that prints floats the way a script host does.
struct ScriptNumbers;

impl Formatter for ScriptNumbers {
    fn write_f32<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        self.write_f64(writer, f64::from(value))
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(format_number(value).as_bytes())
    }
}

/// Compact JSON text for a value, truncated to `width` display columns.
///
/// Never fails: serialization errors yield [`UNSERIALIZABLE`].
#[must_use]
pub fn preview(value: &Value, width: usize) -> String {
    match to_json_text(value) {
        Ok(text) => truncate_to_width(&text, width),
        Err(err) => {
            tapconsole_core::debug!(error = %err, "preview degraded to placeholder");
            UNSERIALIZABLE.to_string()
        }
    }
}

/// Text of a number the way a script host prints it.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Covers -0.
        return "0".to_string();
    }
    let magnitude = n.abs();
    if n.fract() == 0.0 && magnitude < PLAIN_INTEGER_LIMIT {
        return format!("{n:.0}");
    }
    if magnitude >= PLAIN_INTEGER_LIMIT || magnitude < 1e-6 {
        let text = format!("{n:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        };
    }
    format!("{n}")
}

/// Cut `text` to at most `width` display columns, ending in an ellipsis when
/// anything was dropped. Never splits a grapheme cluster.
#[must_use]
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let ellipsis_width = ELLIPSIS.width();
    if width < ellipsis_width {
        return String::new();
    }
    let budget = width - ellipsis_width;
    let mut used = 0;
    let mut out = String::new();
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(grapheme);
    }
    out.push_str(ELLIPSIS);
    out
}

// `None` means "omit": undefined and functions have no JSON form.
fn json_of(value: &Value, open: &mut AHashSet<ValueId>) -> Result<Option<Json>, PreviewError> {
    let json = match value {
        Value::Undefined | Value::Function(_) => return Ok(None),
        Value::Null => Json::Null,
        Value::Boolean(b) => Json::Bool(*b),
        Value::Number(n) => json_number(*n),
        Value::String(s) => Json::String(s.to_string()),
        Value::Element(_) => Json::Object(Map::new()),
        Value::Opaque(opaque) => Json::String(opaque.describe()?),
        Value::Array(array) => {
            let id = array.id();
            if !open.insert(id) {
                return Err(PreviewError::Circular { id });
            }
            let mut items = Vec::with_capacity(array.len());
            for item in array.to_vec() {
                items.push(json_of(&item, open)?.unwrap_or(Json::Null));
            }
            open.remove(&id);
            Json::Array(items)
        }
        Value::Object(object) => {
            let id = object.id();
            if !open.insert(id) {
                return Err(PreviewError::Circular { id });
            }
            let mut map = Map::new();
            for property in object.properties() {
                if !property.enumerable {
                    continue;
                }
                if let Some(json) = json_of(&property.value, open)? {
                    map.insert(property.key, json);
                }
            }
            open.remove(&id);
            Json::Object(map)
        }
    };
    Ok(Some(json))
}

fn json_number(n: f64) -> Json {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        // Integral values print without a fraction; -0 prints as 0.
        return Json::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Json::Null, Json::Number)
}
