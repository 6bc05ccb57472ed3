//
//  life360-client
//  model/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Resource Model
//!
//! Typed representations of the objects returned by the Life360 API.
//!
//! ## Overview
//!
//! Every resource kind declares an explicit field schema. Population from a
//! raw JSON object copies each schema field into its typed slot, applying the
//! matching [`coerce`] function, and keeps every other field in an `extra`
//! side-map so nothing the service sends is lost.
//!
//! Population is re-entrant and sparse: populating again with a fresh payload
//! overwrites the fields it carries and leaves the others untouched.
//!
//! Relationships are expressed with id keys rather than pointers. A
//! [`Member`] records the id of the [`Circle`] that listed it in
//! `circle_id`; resolving it is a lookup in the owning [`ResourceList`].
//!
//! ## Module Structure
//!
//! - [`coerce`]: best-effort conversion to int, float, bool and timestamp
//! - [`coordinates`]: latitude/longitude extraction from loose input
//! - [`circle`], [`member`], [`location`], [`place`], [`safety`],
//!   [`request`], [`session`]: the concrete resource kinds
//!
//! ## Example
//!
//! ```rust
//! use life360_client::model::{Circle, Resource, ResourceId};
//! use serde_json::json;
//!
//! let circle = Circle::from_raw(&json!({
//!     "id": "c-1",
//!     "name": "Family",
//!     "memberCount": "2",
//!     "members": [
//!         {"id": "m-1", "firstName": "Ada", "lastName": "Lovelace"},
//!         {"id": "m-2", "firstName": "Alan", "lastName": "Turing"}
//!     ]
//! }));
//!
//! assert_eq!(circle.member_count.as_ref().and_then(|c| c.get()), Some(2));
//! let alan = circle.members.find_by_name("turing").unwrap();
//! assert_eq!(alan.circle_id, Some(ResourceId::from("c-1")));
//! ```

pub mod circle;
pub mod coerce;
pub mod coordinates;
pub mod location;
pub mod member;
pub mod place;
pub mod request;
pub mod safety;
pub mod session;

pub use circle::*;
pub use coerce::{as_bool, as_float, as_int, as_timestamp, Loose};
pub use coordinates::*;
pub use location::*;
pub use member::*;
pub use place::*;
pub use request::*;
pub use safety::*;
pub use session::*;

use std::fmt;

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use serde_json::{Map, Value};

/// Fills a value from a raw JSON object.
///
/// Implemented by every resource kind and by the nested structures they
/// contain (feature flags, settings, ...).
pub trait Populate {
    /// Copies the fields of `raw` onto `self`, applying coercions.
    ///
    /// Fields absent from `raw` keep their current value.
    fn populate(&mut self, raw: &Map<String, Value>);
}

/// An API-backed object with an identity.
pub trait Resource: Populate {
    /// The upstream-assigned identifier, if the payload carried one.
    fn id(&self) -> Option<&ResourceId> {
        None
    }

    /// The name-bearing values matched by [`ResourceList::find_by_name`].
    fn names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Fields of the payload that are not part of the schema.
    fn extra(&self) -> &Map<String, Value>;

    /// Builds a fresh resource from a raw JSON value.
    ///
    /// A value that is not a JSON object yields an empty resource.
    fn from_raw(raw: &Value) -> Self
    where
        Self: Default + Sized,
    {
        let mut resource = Self::default();
        if let Some(object) = raw.as_object() {
            resource.populate(object);
        }
        resource
    }
}

/// An upstream identifier: integer or string, compared exactly.
///
/// `ResourceId::Int(5)` and `ResourceId::Text("5")` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ResourceId {
    /// A numeric identifier.
    Int(i64),
    /// A string identifier (usually a UUID).
    Text(String),
}

impl ResourceId {
    /// Reads an id from a JSON value. Only integers and strings qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_i64().map(Self::Int),
            Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &ResourceId) -> Self {
        id.clone()
    }
}

/// Walks a raw object on behalf of a resource's `populate`.
///
/// Each accessor claims its key when it stores the value; [`Fields::finish`]
/// copies every unclaimed key into the resource's `extra` map and drops
/// claimed keys from it, so a key lives in exactly one place. A schema key
/// whose value has an unusable shape (an object where text was expected, for
/// instance) clears its slot and lands in `extra` instead.
///
/// JSON `null` clears the slot.
pub(crate) struct Fields<'a> {
    raw: &'a Map<String, Value>,
    claimed: Vec<&'static str>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(raw: &'a Map<String, Value>) -> Self {
        Self {
            raw,
            claimed: Vec::new(),
        }
    }

    fn claim(&mut self, key: &'static str) -> Option<&'a Value> {
        let value = self.raw.get(key)?;
        self.claimed.push(key);
        Some(value)
    }

    /// Returns the raw value of `key` without claiming it.
    pub(crate) fn peek(&self, key: &str) -> Option<&'a Value> {
        self.raw.get(key)
    }

    pub(crate) fn id(&mut self, key: &'static str, slot: &mut Option<ResourceId>) {
        let Some(value) = self.peek(key) else {
            return;
        };
        *slot = ResourceId::from_value(value);
        if slot.is_some() || value.is_null() {
            self.claimed.push(key);
        }
    }

    /// Like [`Fields::id`], but digit strings become integer ids.
    pub(crate) fn int_id(&mut self, key: &'static str, slot: &mut Option<ResourceId>) {
        let Some(value) = self.peek(key) else {
            return;
        };
        *slot = match as_int(value) {
            Loose::Typed(id) => Some(ResourceId::Int(id)),
            Loose::Raw(raw) => ResourceId::from_value(&raw),
        };
        if slot.is_some() || value.is_null() {
            self.claimed.push(key);
        }
    }

    pub(crate) fn text(&mut self, key: &'static str, slot: &mut Option<String>) {
        let text = match self.peek(key) {
            None => return,
            Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Number(number)) => Some(number.to_string()),
            Some(Value::Bool(flag)) => Some(flag.to_string()),
            Some(_) => {
                *slot = None;
                return;
            }
        };
        self.claimed.push(key);
        *slot = text;
    }

    pub(crate) fn int(&mut self, key: &'static str, slot: &mut Option<Loose<i64>>) {
        if let Some(value) = self.claim(key) {
            *slot = (!value.is_null()).then(|| as_int(value));
        }
    }

    pub(crate) fn float(&mut self, key: &'static str, slot: &mut Option<Loose<f64>>) {
        if let Some(value) = self.claim(key) {
            *slot = (!value.is_null()).then(|| as_float(value));
        }
    }

    pub(crate) fn bool(&mut self, key: &'static str, slot: &mut Option<Loose<bool>>) {
        if let Some(value) = self.claim(key) {
            *slot = (!value.is_null()).then(|| as_bool(value));
        }
    }

    pub(crate) fn timestamp(&mut self, key: &'static str, slot: &mut Option<Loose<DateTime<Utc>>>) {
        if let Some(value) = self.claim(key) {
            *slot = as_timestamp(value);
        }
    }

    /// Populates a nested structure in place, creating it on first sight.
    pub(crate) fn nested<P: Populate + Default>(&mut self, key: &'static str, slot: &mut Option<P>) {
        match self.peek(key) {
            Some(Value::Object(object)) => {
                self.claimed.push(key);
                slot.get_or_insert_with(P::default).populate(object);
            }
            Some(Value::Null) => {
                self.claimed.push(key);
                *slot = None;
            }
            Some(_) => *slot = None,
            None => {}
        }
    }

    /// Claims `key` when it holds an array and returns its items.
    pub(crate) fn array(&mut self, key: &'static str) -> Option<&'a [Value]> {
        match self.peek(key) {
            Some(Value::Array(items)) => {
                self.claimed.push(key);
                Some(items.as_slice())
            }
            _ => None,
        }
    }

    /// Copies every unclaimed field into `extra`, overwriting older values,
    /// and removes claimed fields left there by an earlier populate.
    pub(crate) fn finish(self, extra: &mut Map<String, Value>) {
        for key in &self.claimed {
            extra.remove(*key);
        }
        for (key, value) in self.raw {
            if !self.claimed.contains(&key.as_str()) {
                extra.insert(key.clone(), value.clone());
            }
        }
    }
}

/// An ordered, appendable collection of resources.
///
/// Items are indexed `0..len()`. The list only grows through
/// [`add_child`](Self::add_child) and only shrinks through
/// [`clear_children`](Self::clear_children), which drops every item at once.
///
/// Iteration is restartable: every call to [`iter`](Self::iter) starts at
/// index 0.
///
/// # Example
///
/// ```rust
/// use life360_client::model::{Place, Resource, ResourceList};
/// use serde_json::json;
///
/// let mut places = ResourceList::new();
/// places.add_child(Place::from_raw(&json!({"id": "p-1", "name": "Home"})));
/// places.add_child(Place::from_raw(&json!({"id": "p-2", "name": "Work"})));
///
/// assert_eq!(places.len(), 2);
/// assert_eq!(places.find_by_name("^wo").unwrap().name.as_deref(), Some("Work"));
/// assert!(places.find_by_id("p-3").is_none());
///
/// places.clear_children();
/// assert!(places.is_empty());
/// assert_eq!(places.iter().count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResourceList<T> {
    items: Vec<T>,
}

impl<T> Default for ResourceList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> ResourceList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `child` at index `len()` and returns a reference to it.
    pub fn add_child(&mut self, child: T) -> &mut T {
        let index = self.items.len();
        self.items.push(child);
        &mut self.items[index]
    }

    /// Removes every item; `len()` becomes 0.
    pub fn clear_children(&mut self) {
        self.items.clear();
    }

    /// Number of items in the list.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Iterates over the items in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterates mutably over the items in index order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T: Resource> ResourceList<T> {
    /// Returns the first item whose id equals `id`.
    pub fn find_by_id(&self, id: impl Into<ResourceId>) -> Option<&T> {
        let id = id.into();
        self.items.iter().find(|item| item.id() == Some(&id))
    }

    /// Returns the first item with a name matching `pattern`.
    ///
    /// The pattern is a case-insensitive regular expression matched anywhere
    /// in each of the item's [`names`](Resource::names). A pattern that is not
    /// a valid regular expression is matched as a literal substring.
    pub fn find_by_name(&self, pattern: &str) -> Option<&T> {
        let matcher = NameMatcher::new(pattern);
        self.items
            .iter()
            .find(|item| item.names().iter().any(|name| matcher.is_match(name)))
    }
}

impl<T: Resource + Default> ResourceList<T> {
    /// Builds a list by populating one resource per raw JSON item.
    pub fn from_raw_items(items: &[Value]) -> Self {
        items.iter().map(T::from_raw).collect()
    }
}

enum NameMatcher {
    Pattern(Regex),
    Literal(String),
}

impl NameMatcher {
    fn new(pattern: &str) -> Self {
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Self::Pattern(regex),
            Err(_) => Self::Literal(pattern.to_lowercase()),
        }
    }

    fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Pattern(regex) => regex.is_match(name),
            Self::Literal(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

impl<T> FromIterator<T> for ResourceList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for ResourceList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResourceList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
