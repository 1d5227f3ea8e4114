//! Attribute maps attached to runs of text.

use std::collections::BTreeMap;
use std::fmt;

use smol_str::SmolStr;

/// Value of a single text attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    /// Presence-only formatting (bold, italic, code).
    Flag,
    /// Attribute carrying a string payload, such as a footnote title.
    Text(SmolStr),
}

impl AttributeValue {
    pub fn text(value: impl Into<SmolStr>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&SmolStr> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("true"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered attribute map for one run of text.
///
/// Ordering is by key so two maps with the same entries always compare equal,
/// which is what run merging relies on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Attributes(BTreeMap<SmolStr, AttributeValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<SmolStr>, value: AttributeValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    /// Text payload stored under `key`, if any. Flags yield `None`.
    pub fn get_text(&self, key: &str) -> Option<&SmolStr> {
        self.get(key).and_then(AttributeValue::as_text)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<SmolStr>, value: AttributeValue) -> Option<AttributeValue> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.0.remove(key)
    }

    /// Copy of this map without `key`.
    pub fn without(&self, key: &str) -> Self {
        let mut attrs = self.clone();
        attrs.remove(key);
        attrs
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &AttributeValue)> {
        self.0.iter()
    }
}

impl<K: Into<SmolStr>> FromIterator<(K, AttributeValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, AttributeValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
