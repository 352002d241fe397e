//! Insertion-ordered string maps.
//!
//! Attribute and meta maps must render in the order they were written, so
//! they are kept as a list of pairs rather than a hash map.

use std::fmt;
use std::marker::PhantomData;

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};

/// A map that iterates in insertion order.
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if let Some((_, slot)) = self.0.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }
        self.0.push((key, value));
        None
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Value of a configured HTML attribute.
///
/// `true` renders the bare attribute name (e.g. `async`), `false` omits the
/// attribute entirely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Flag(bool),
    Text(String),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Attribute map for `html`, `body` and the container element.
pub type Attributes = OrderedMap<AttrValue>;

/// Name/content pairs for `meta` elements.
pub type MetaPairs = OrderedMap<String>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_preserves_order() {
        let mut map = MetaPairs::new();
        map.insert("zeta", "1".to_owned());
        map.insert("alpha", "2".to_owned());
        map.insert("mid", "3".to_owned());

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_insert_existing_key_replaces_in_place() {
        let mut map: Attributes = [("lang", "fr"), ("class", "doc")]
            .into_iter()
            .map(|(k, v)| (k, AttrValue::from(v)))
            .collect();

        let previous = map.insert("lang", AttrValue::from("en-us"));

        assert_eq!(previous, Some(AttrValue::from("fr")));
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![
                ("lang", &AttrValue::from("en-us")),
                ("class", &AttrValue::from("doc"))
            ]
        );
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        #[derive(Deserialize)]
        struct Wrapper {
            meta: MetaPairs,
        }

        let toml = r#"
[meta]
viewport = "width=device-width"
description = "A page"
author = "Someone"
"#;
        let wrapper: Wrapper = toml::from_str(toml).unwrap();
        assert_eq!(
            wrapper.meta.keys().collect::<Vec<_>>(),
            vec!["viewport", "description", "author"]
        );
    }

    #[test]
    fn test_deserialize_flag_and_text_values() {
        #[derive(Deserialize)]
        struct Wrapper {
            attr: Attributes,
        }

        let toml = r#"
[attr]
class = "article"
hidden = true
draggable = false
"#;
        let wrapper: Wrapper = toml::from_str(toml).unwrap();
        assert_eq!(wrapper.attr.get("class"), Some(&AttrValue::from("article")));
        assert_eq!(wrapper.attr.get("hidden"), Some(&AttrValue::Flag(true)));
        assert_eq!(wrapper.attr.get("draggable"), Some(&AttrValue::Flag(false)));
    }
}
