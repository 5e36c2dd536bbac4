#![forbid(unsafe_code)]

//! Value classification.
//!
//! [`ValueKind`] is a closed set; [`classify`] maps every [`Value`] to exactly
//! one kind. [`ValueKind::from_type_tag`] applies the same table to raw host
//! type tags for hosts that only have the tag string.

use crate::value::Value;

/// Display category of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    String,
    Number,
    Boolean,
    FunctionRef,
    ArrayLike,
    StructuredObject,
    MarkupElement,
    Unknown,
}

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Undefined,
        Self::Null,
        Self::String,
        Self::Number,
        Self::Boolean,
        Self::FunctionRef,
        Self::ArrayLike,
        Self::StructuredObject,
        Self::MarkupElement,
        Self::Unknown,
    ];

    /// Classify a value. Total: opaque host values fall to `Unknown`.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Undefined => Self::Undefined,
            Value::Null => Self::Null,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Boolean(_) => Self::Boolean,
            Value::Function(_) => Self::FunctionRef,
            Value::Array(_) => Self::ArrayLike,
            Value::Object(_) => Self::StructuredObject,
            Value::Element(_) => Self::MarkupElement,
            Value::Opaque(_) => Self::Unknown,
        }
    }

    /// Map a raw host type tag (`Object.prototype.toString` vocabulary).
    #[must_use]
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            "Undefined" => Self::Undefined,
            "Null" => Self::Null,
            "String" => Self::String,
            "Number" => Self::Number,
            "Boolean" => Self::Boolean,
            "Function" | "AsyncFunction" | "GeneratorFunction" | "AsyncGeneratorFunction" => {
                Self::FunctionRef
            }
            "Array" | "Arguments" => Self::ArrayLike,
            "Object" => Self::StructuredObject,
            "Element" => Self::MarkupElement,
            other if is_element_tag(other) => Self::MarkupElement,
            _ => Self::Unknown,
        }
    }

    /// Whether nodes of this kind can be expanded into child rows.
    #[inline]
    #[must_use]
    pub const fn is_expandable(self) -> bool {
        matches!(self, Self::ArrayLike | Self::StructuredObject)
    }

    /// Presentation class applied by hosts. Strings and unknown values are unstyled.
    #[must_use]
    pub const fn style_class(self) -> Option<&'static str> {
        match self {
            Self::Undefined => Some("variable undefined"),
            Self::Null => Some("variable null"),
            Self::Number => Some("variable number"),
            Self::Boolean => Some("variable boolean"),
            Self::FunctionRef => Some("variable function"),
            Self::ArrayLike => Some("variable array"),
            Self::StructuredObject => Some("variable object"),
            Self::MarkupElement => Some("variable element"),
            Self::String | Self::Unknown => None,
        }
    }

    /// Stable lowercase name, used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::FunctionRef => "function",
            Self::ArrayLike => "array",
            Self::StructuredObject => "object",
            Self::MarkupElement => "element",
            Self::Unknown => "unknown",
        }
    }
}

/// Classify a value. Shorthand for [`ValueKind::of`].
#[inline]
#[must_use]
pub fn classify(value: &Value) -> ValueKind {
    ValueKind::of(value)
}

// `HTMLDivElement`, `SVGPathElement`, `HTMLElement`, ...
fn is_element_tag(tag: &str) -> bool {
    tag.ends_with("Element") && (tag.starts_with("HTML") || tag.starts_with("SVG"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{DescribeError, OpaqueValue};

    #[derive(Debug)]
    struct Symbol;

    impl OpaqueValue for Symbol {
        fn type_tag(&self) -> &str {
            "Symbol"
        }

        fn describe(&self) -> Result<String, DescribeError> {
            Ok("Symbol(id)".into())
        }
    }

    #[test]
    fn primitives() {
        assert_eq!(classify(&Value::Undefined), ValueKind::Undefined);
        assert_eq!(classify(&Value::Null), ValueKind::Null);
        assert_eq!(classify(&Value::from("s")), ValueKind::String);
        assert_eq!(classify(&Value::from(f64::NAN)), ValueKind::Number);
        assert_eq!(classify(&Value::from(false)), ValueKind::Boolean);
    }

    #[test]
    fn arrays_objects_and_callables_are_distinguished() {
        assert_eq!(classify(&Value::array([1])), ValueKind::ArrayLike);
        assert_eq!(classify(&Value::object([("a", 1)])), ValueKind::StructuredObject);
        assert_eq!(classify(&Value::function("() => 1")), ValueKind::FunctionRef);
        assert_eq!(
            classify(&Value::element("div", "<div></div>")),
            ValueKind::MarkupElement
        );
    }

    #[test]
    fn opaque_is_unknown() {
        let value = Value::opaque(Symbol);
        assert_eq!(classify(&value), ValueKind::Unknown);
        assert!(!ValueKind::Unknown.is_expandable());
        assert_eq!(ValueKind::Unknown.style_class(), None);
    }

    #[test]
    fn type_tag_table() {
        assert_eq!(ValueKind::from_type_tag("Array"), ValueKind::ArrayLike);
        assert_eq!(ValueKind::from_type_tag("Arguments"), ValueKind::ArrayLike);
        assert_eq!(ValueKind::from_type_tag("AsyncFunction"), ValueKind::FunctionRef);
        assert_eq!(ValueKind::from_type_tag("HTMLDivElement"), ValueKind::MarkupElement);
        assert_eq!(ValueKind::from_type_tag("SVGPathElement"), ValueKind::MarkupElement);
        assert_eq!(ValueKind::from_type_tag("Map"), ValueKind::Unknown);
        assert_eq!(ValueKind::from_type_tag(""), ValueKind::Unknown);
        assert_eq!(ValueKind::from_type_tag("Elements"), ValueKind::Unknown);
    }

    #[test]
    fn only_containers_expand() {
        let expandable: Vec<_> = ValueKind::ALL
            .iter()
            .copied()
            .filter(|k| k.is_expandable())
            .collect();
        assert_eq!(
            expandable,
            vec![ValueKind::ArrayLike, ValueKind::StructuredObject]
        );
    }

    #[test]
    fn structural_tags_agree_with_classification() {
        let values = [
            Value::Undefined,
            Value::Null,
            Value::from("x"),
            Value::from(1),
            Value::from(true),
            Value::function("function f() {}"),
            Value::array([1, 2]),
            Value::object([("k", "v")]),
            Value::element("p", "<p>hi</p>"),
        ];
        for value in &values {
            assert_eq!(ValueKind::from_type_tag(value.type_tag()), classify(value));
        }
    }
}
