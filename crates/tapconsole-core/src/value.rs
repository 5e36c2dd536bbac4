#![forbid(unsafe_code)]

//! Runtime values handed to the overlay by the host.
//!
//! [`Value`] mirrors the dynamically typed values a page logs. Arrays and
//! objects are reference types: cloning a [`Value`] shares storage, mutations
//! are visible through every handle, and identity is observable through
//! [`ValueId`]. Object graphs may contain cycles.
//!
//! # Example
//!
//! ```
//! use tapconsole_core::value::{ObjectRef, Value};
//!
//! let point = ObjectRef::new();
//! point.set("x", 1.0);
//! point.set("y", 2.0);
//! let value = Value::Object(point.clone());
//!
//! point.set("x", 5.0);
//! let Value::Object(seen) = value else { unreachable!() };
//! assert_eq!(seen.get("x").and_then(|v| v.as_number()), Some(5.0));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Identity of a shared array or object.
///
/// Two handles share an id exactly when they point at the same storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(usize);

impl ValueId {
    fn of<T: ?Sized>(rc: &Rc<T>) -> Self {
        Self(Rc::as_ptr(rc).cast::<()>() as usize)
    }
}

/// A dynamically typed runtime value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    String(Rc<str>),
    Number(f64),
    Boolean(bool),
    Function(FunctionValue),
    Array(ArrayRef),
    Object(ObjectRef),
    Element(ElementValue),
    /// Host object with no structural representation (dates, symbols, maps...).
    Opaque(Rc<dyn OpaqueValue>),
}

impl Value {
    /// Build an array value from elements.
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::Array(ArrayRef::from_values(items.into_iter().map(Into::into)))
    }

    /// Build a plain object (no prototype) from `(key, value)` pairs.
    #[must_use]
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Object(ObjectRef::from_entries(entries))
    }

    /// Build a function value from its source text.
    #[must_use]
    pub fn function(source: impl Into<Rc<str>>) -> Self {
        Self::Function(FunctionValue::new(source))
    }

    /// Build a markup element value.
    #[must_use]
    pub fn element(tag_name: impl Into<Rc<str>>, markup: impl Into<Rc<str>>) -> Self {
        Self::Element(ElementValue::new(tag_name, markup))
    }

    /// Wrap a host object.
    #[must_use]
    pub fn opaque(value: impl OpaqueValue + 'static) -> Self {
        Self::Opaque(Rc::new(value))
    }

    /// Identity of shared storage, for arrays and objects only.
    #[must_use]
    pub fn identity(&self) -> Option<ValueId> {
        match self {
            Self::Array(array) => Some(array.id()),
            Self::Object(object) => Some(object.id()),
            _ => None,
        }
    }

    /// Raw host type tag, in the `Object.prototype.toString` vocabulary.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Undefined => "Undefined",
            Self::Null => "Null",
            Self::String(_) => "String",
            Self::Number(_) => "Number",
            Self::Boolean(_) => "Boolean",
            Self::Function(_) => "Function",
            Self::Array(_) => "Array",
            Self::Object(_) => "Object",
            Self::Element(_) => "HTMLElement",
            Self::Opaque(opaque) => opaque.type_tag(),
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Whether both values refer to the same shared storage.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        matches!((self.identity(), other.identity()), (Some(a), Some(b)) if a == b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Rc::from(s))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<ArrayRef> for Value {
    fn from(array: ArrayRef) -> Self {
        Self::Array(array)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Self::Object(object)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Functions and elements
// ---------------------------------------------------------------------------

/// A callable value, kept as its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionValue {
    source: Rc<str>,
}

impl FunctionValue {
    #[must_use]
    pub fn new(source: impl Into<Rc<str>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Source text form, as the host's `String(fn)` would produce.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// A reference to a markup element, kept as its serialized markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementValue {
    tag_name: Rc<str>,
    markup: Rc<str>,
}

impl ElementValue {
    #[must_use]
    pub fn new(tag_name: impl Into<Rc<str>>, markup: impl Into<Rc<str>>) -> Self {
        Self {
            tag_name: tag_name.into(),
            markup: markup.into(),
        }
    }

    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Serialized markup (outer HTML).
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

// ---------------------------------------------------------------------------
// Opaque host values
// ---------------------------------------------------------------------------

/// Error produced when a host object cannot describe itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeError {
    message: String,
}

impl DescribeError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DescribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot describe value: {}", self.message)
    }
}

impl std::error::Error for DescribeError {}

/// A host object outside the structural value model.
///
/// Opaque values always classify as [`ValueKind::Unknown`](crate::ValueKind).
pub trait OpaqueValue: fmt::Debug {
    /// Host type tag, e.g. `"Date"` or `"Symbol"`.
    fn type_tag(&self) -> &str;

    /// Text shown for the value. May fail, the way a throwing `toString` does.
    fn describe(&self) -> Result<String, DescribeError>;
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

/// Shared, mutable array storage.
#[derive(Clone, Default)]
pub struct ArrayRef(Rc<RefCell<Vec<Value>>>);

impl ArrayRef {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self(Rc::new(RefCell::new(values.into_iter().collect())))
    }

    #[must_use]
    pub fn id(&self) -> ValueId {
        ValueId::of(&self.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    /// Store `value` at `index`, filling any gap with `undefined`.
    pub fn set(&self, index: usize, value: impl Into<Value>) {
        let mut items = self.0.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value.into();
    }

    pub fn truncate(&self, len: usize) {
        self.0.borrow_mut().truncate(len);
    }

    /// Snapshot of the current elements.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ArrayRef {
    // Elements are not printed: arrays may contain themselves.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayRef")
            .field("id", &self.id())
            .field("len", &self.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

/// One named slot of an object.
#[derive(Debug, Clone)]
pub struct Property {
    pub key: String,
    pub value: Value,
    /// Non-enumerable properties are only listed when inspecting prototypes.
    pub enumerable: bool,
}

#[derive(Default)]
struct ObjectData {
    constructor_name: Option<String>,
    properties: Vec<Property>,
    prototype: Option<ObjectRef>,
}

/// Shared, mutable object storage with an optional prototype.
///
/// Properties keep insertion order; the inspector sorts them at display time.
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<ObjectData>>);

impl ObjectRef {
    /// A plain object with no prototype.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain object whose prototype is `prototype`.
    #[must_use]
    pub fn with_prototype(prototype: ObjectRef) -> Self {
        let object = Self::new();
        object.set_prototype(Some(prototype));
        object
    }

    /// An object acting as the prototype of instances built by `name`.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let object = Self::new();
        object.set_constructor_name(Some(name.into()));
        object
    }

    /// A plain object populated with enumerable properties.
    #[must_use]
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let object = Self::new();
        for (key, value) in entries {
            object.set(key, value);
        }
        object
    }

    #[must_use]
    pub fn id(&self) -> ValueId {
        ValueId::of(&self.0)
    }

    /// Set an enumerable property, replacing in place if the key exists.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.define(key, value, true);
    }

    /// Set a property with explicit enumerability.
    pub fn define(&self, key: impl Into<String>, value: impl Into<Value>, enumerable: bool) {
        let key = key.into();
        let value = value.into();
        let mut data = self.0.borrow_mut();
        if let Some(existing) = data.properties.iter_mut().find(|p| p.key == key) {
            existing.value = value;
            existing.enumerable = enumerable;
        } else {
            data.properties.push(Property {
                key,
                value,
                enumerable,
            });
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0
            .borrow()
            .properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.clone())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut data = self.0.borrow_mut();
        let index = data.properties.iter().position(|p| p.key == key)?;
        Some(data.properties.remove(index).value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().properties.iter().any(|p| p.key == key)
    }

    /// Number of own properties, enumerable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().properties.is_empty()
    }

    /// Snapshot of own properties in insertion order.
    #[must_use]
    pub fn properties(&self) -> Vec<Property> {
        self.0.borrow().properties.clone()
    }

    /// Own enumerable keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.0
            .borrow()
            .properties
            .iter()
            .filter(|p| p.enumerable)
            .map(|p| p.key.clone())
            .collect()
    }

    #[must_use]
    pub fn prototype(&self) -> Option<ObjectRef> {
        self.0.borrow().prototype.clone()
    }

    pub fn set_prototype(&self, prototype: Option<ObjectRef>) {
        self.0.borrow_mut().prototype = prototype;
    }

    /// Name of the constructor this object is the prototype of, if any.
    #[must_use]
    pub fn constructor_name(&self) -> Option<String> {
        self.0.borrow().constructor_name.clone()
    }

    pub fn set_constructor_name(&self, name: Option<String>) {
        self.0.borrow_mut().constructor_name = name;
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectRef {
    // Properties are not printed: object graphs may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("ObjectRef")
            .field("id", &self.id())
            .field("constructor_name", &data.constructor_name)
            .field("len", &data.properties.len())
            .field("has_prototype", &data.prototype.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Date(&'static str);

    impl OpaqueValue for Date {
        fn type_tag(&self) -> &str {
            "Date"
        }

        fn describe(&self) -> Result<String, DescribeError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn clones_share_object_storage() {
        let object = ObjectRef::new();
        let value = Value::Object(object.clone());
        object.set("k", 1);
        assert_eq!(
            value.as_object().and_then(|o| o.get("k")).and_then(|v| v.as_number()),
            Some(1.0)
        );
        assert_eq!(value.identity(), Some(object.id()));
    }

    #[test]
    fn distinct_objects_have_distinct_ids() {
        let a = ObjectRef::new();
        let b = ObjectRef::new();
        assert_ne!(a.id(), b.id());
        assert!(!Value::Object(a.clone()).same_identity(&Value::Object(b)));
        assert!(Value::Object(a.clone()).same_identity(&Value::Object(a)));
    }

    #[test]
    fn set_replaces_in_place() {
        let object = ObjectRef::from_entries([("a", 1), ("b", 2)]);
        object.set("a", 3);
        assert_eq!(object.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(object.get("a").and_then(|v| v.as_number()), Some(3.0));
    }

    #[test]
    fn non_enumerable_properties_are_hidden_from_keys() {
        let object = ObjectRef::new();
        object.define("hidden", 1, false);
        object.set("shown", 2);
        assert_eq!(object.keys(), vec!["shown".to_string()]);
        assert_eq!(object.len(), 2);
    }

    #[test]
    fn remove_returns_value() {
        let object = ObjectRef::from_entries([("a", 1)]);
        assert!(object.remove("a").is_some());
        assert!(object.remove("a").is_none());
        assert!(object.is_empty());
    }

    #[test]
    fn array_set_fills_holes_with_undefined() {
        let array = ArrayRef::new();
        array.set(2, "x");
        assert_eq!(array.len(), 3);
        assert!(matches!(array.get(0), Some(Value::Undefined)));
        assert_eq!(array.get(2).as_ref().and_then(Value::as_str), Some("x"));
    }

    #[test]
    fn debug_of_self_referencing_object_terminates() {
        let object = ObjectRef::new();
        object.set("me", object.clone());
        let array = ArrayRef::new();
        array.push(array.clone());
        let dbg = format!("{:?} {:?}", object, array);
        assert!(dbg.contains("ObjectRef"));
        assert!(dbg.contains("ArrayRef"));
    }

    #[test]
    fn type_tags() {
        assert_eq!(Value::Undefined.type_tag(), "Undefined");
        assert_eq!(Value::array([1, 2]).type_tag(), "Array");
        assert_eq!(Value::object([("a", 1)]).type_tag(), "Object");
        assert_eq!(Value::opaque(Date("2024-01-01")).type_tag(), "Date");
    }

    #[test]
    fn option_converts_to_null() {
        assert!(matches!(Value::from(None::<bool>), Value::Null));
        assert!(matches!(Value::from(Some(true)), Value::Boolean(true)));
    }
}
