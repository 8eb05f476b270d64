//! Element attributes
//!
//! Attributes keep first-seen order; setting an existing key overwrites the
//! value in place. Serialization sorts by key, so the stored order only
//! matters for iteration.

use std::fmt;

/// An attribute value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    /// A regular `key="value"` attribute
    Text(String),
    /// A valueless attribute such as `disabled`. Reads as `"true"`.
    Flag,
}

impl AttrValue {
    /// The value as text. Flags read as `"true"`.
    pub fn as_str(&self) -> &str {
        match self {
            AttrValue::Text(text) => text,
            AttrValue::Flag => "true",
        }
    }

    #[inline]
    pub fn is_flag(&self) -> bool {
        matches!(self, AttrValue::Flag)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// Attribute map of an element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Get a value by name as text (flags read as `"true"`)
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(AttrValue::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a value. An existing key keeps its position and takes the new value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Set a valueless attribute
    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.set(name, AttrValue::Flag);
    }

    /// Remove an attribute, returning its value
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Keep only the attributes for which `predicate` returns true
    pub fn retain<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&str, &AttrValue) -> bool,
    {
        self.entries.retain(|(key, value)| predicate(key.as_str(), value));
    }

    /// Iterate in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Attributes ordered by key (ordinal), the order used for output
    pub fn sorted(&self) -> Vec<(&str, &AttrValue)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));
        sorted
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.set(key, value);
        }
        attributes
    }
}
