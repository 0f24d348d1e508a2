//! Property bags for extensible models.
//!
//! An open model decodes its declared fields like any other [`Model`], then
//! keeps every key the schema did not consume in a [`PropertyBag`]. Encoding
//! writes declared fields first and bag entries after, so decode followed by
//! encode reproduces the same keys and values.
//!
//! A declared field that arrived as `null` decodes to `None`, the same as an
//! absent one. The bag remembers its name apart from the entries so the
//! `null` is written back on encode.
//!
//! [`Model`]: super::Model

use serde_json::map::Iter;
use serde_json::{Map, Value};

/// Undeclared JSON properties carried alongside an open model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBag {
    entries: Map<String, Value>,
    declared_nulls: Vec<String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Declared field names that were present with a JSON `null`.
    pub fn declared_nulls(&self) -> impl Iterator<Item = &str> {
        self.declared_nulls.iter().map(String::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.entries
    }
}

impl From<Map<String, Value>> for PropertyBag {
    fn from(entries: Map<String, Value>) -> Self {
        Self {
            entries,
            declared_nulls: Vec::new(),
        }
    }
}

impl<'a> IntoIterator for &'a PropertyBag {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Copies every entry of `object` whose key is not in `consumed`.
///
/// Consumed keys holding `null` are recorded as declared nulls. `object`
/// itself is left untouched.
pub fn capture_residual(object: &Map<String, Value>, consumed: &[&str]) -> PropertyBag {
    let mut bag = PropertyBag::new();
    for (key, value) in object {
        if !consumed.contains(&key.as_str()) {
            bag.entries.insert(key.clone(), value.clone());
        } else if value.is_null() {
            bag.declared_nulls.push(key.clone());
        }
    }
    bag
}
