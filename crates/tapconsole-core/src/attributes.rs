#![forbid(unsafe_code)]

//! Attribute sources for object inspection.
//!
//! An object is inspected through two [`AttributeSource`]s:
//!
//! - **Own**: enumerable properties stored on the object itself.
//! - **Inherited**: enumerable properties reachable through the prototype
//!   chain and not shadowed by a nearer key.
//!
//! Each group is sorted with [`compare_keys`]. The result is never cached:
//! every call reflects the live object graph.
//!
//! # Key ordering
//!
//! Keys that parse as numbers compare numerically and sort before other keys;
//! other keys compare as strings. Keys with equal numeric value (`"1"` and
//! `"1.0"`) keep their enumeration order because the sort is stable.

use std::cmp::Ordering;

use ahash::AHashSet;

use crate::value::{ObjectRef, Value, ValueId};

/// Label used for a prototype row when the prototype has no constructor name.
pub const ANONYMOUS_PROTOTYPE_LABEL: &str = "[[Prototype]]";

/// One `(key, value)` row.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub key: String,
    pub value: Value,
}

/// Where attributes are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeSource {
    Own,
    Inherited,
}

impl AttributeSource {
    /// Collect this source's attributes of `object`, sorted by key.
    #[must_use]
    pub fn collect(self, object: &ObjectRef) -> Vec<Attribute> {
        let mut attributes = match self {
            Self::Own => own_enumerable(object),
            Self::Inherited => inherited_enumerable(object),
        };
        sort_attributes(&mut attributes);
        attributes
    }
}

/// Own and inherited attributes of one object, each sorted by key.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    pub own: Vec<Attribute>,
    pub inherited: Vec<Attribute>,
}

impl AttributeSet {
    /// Derive the attribute set from the object's current state.
    #[must_use]
    pub fn of(object: &ObjectRef) -> Self {
        Self {
            own: AttributeSource::Own.collect(object),
            inherited: AttributeSource::Inherited.collect(object),
        }
    }

    /// Own attributes first, then inherited ones.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.own.iter().chain(self.inherited.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.own.len() + self.inherited.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.own.is_empty() && self.inherited.is_empty()
    }
}

/// Trailing row describing an object's prototype.
#[derive(Debug, Clone)]
pub struct PrototypeRow {
    /// Constructor name of the prototype, or [`ANONYMOUS_PROTOTYPE_LABEL`].
    pub label: String,
    /// Identity of the prototype the snapshot was taken from.
    pub origin: ValueId,
    /// Synthetic object holding the prototype's own properties, sorted by key.
    ///
    /// Its own prototype is the next link of the chain, so the chain can be
    /// walked one level per expansion.
    pub snapshot: ObjectRef,
}

impl PrototypeRow {
    /// Build the prototype row for `object`, if it has a prototype.
    #[must_use]
    pub fn of(object: &ObjectRef) -> Option<Self> {
        let prototype = object.prototype()?;
        let label = prototype
            .constructor_name()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| ANONYMOUS_PROTOTYPE_LABEL.to_string());

        // Every own property name counts here, enumerable or not: methods
        // live on prototypes as non-enumerable slots.
        let mut attributes: Vec<Attribute> = prototype
            .properties()
            .into_iter()
            .map(|p| Attribute {
                key: p.key,
                value: p.value,
            })
            .collect();
        sort_attributes(&mut attributes);

        let snapshot = ObjectRef::new();
        for attribute in attributes {
            snapshot.set(attribute.key, attribute.value);
        }
        snapshot.set_prototype(prototype.prototype());

        Some(Self {
            label,
            origin: prototype.id(),
            snapshot,
        })
    }
}

/// Natural key ordering: numeric keys first (by value), then string order.
#[must_use]
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Stable sort by [`compare_keys`].
pub fn sort_attributes(attributes: &mut [Attribute]) {
    attributes.sort_by(|a, b| compare_keys(&a.key, &b.key));
}

fn numeric_key(key: &str) -> Option<f64> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn own_enumerable(object: &ObjectRef) -> Vec<Attribute> {
    object
        .properties()
        .into_iter()
        .filter(|p| p.enumerable)
        .map(|p| Attribute {
            key: p.key,
            value: p.value,
        })
        .collect()
}

fn inherited_enumerable(object: &ObjectRef) -> Vec<Attribute> {
    // Any own key shadows inherited ones, enumerable or not.
    let mut shadowed: AHashSet<String> = object.properties().into_iter().map(|p| p.key).collect();
    let mut visited: AHashSet<ValueId> = AHashSet::new();
    visited.insert(object.id());

    let mut out = Vec::new();
    let mut link = object.prototype();
    while let Some(prototype) = link {
        if !visited.insert(prototype.id()) {
            break;
        }
        for property in prototype.properties() {
            if shadowed.insert(property.key.clone()) && property.enumerable {
                out.push(Attribute {
                    key: property.key,
                    value: property.value,
                });
            }
        }
        link = prototype.prototype();
    }
    out
}
