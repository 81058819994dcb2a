//! Raw taxonomy documents as written by a taxonomy author.
//!
//! Objects keep their declaration order: it is the tie-break order of the
//! precedence resolver, so it must survive deserialization.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use cryptoql_core::errors::TaxonomyError;

/// A string-keyed map that iterates in insertion order.
///
/// Re-inserting an existing key replaces its value but keeps its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map with string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// The four top-level sections of a taxonomy document.
///
/// ```json
/// {
///   "algorithms": { "Hash": { "MD": ["md5", "md4"] } },
///   "modes": { "block": ["ecb", "cbc"] },
///   "alternatives": { "Hash": { "MD": "sha256" } },
///   "default_alternatives": { "Hash": "sha3" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyDocument {
    /// category -> subcategory -> tokens.
    pub algorithms: OrderedMap<OrderedMap<Vec<String>>>,
    /// mode family -> tokens.
    pub modes: OrderedMap<Vec<String>>,
    /// category -> subcategory -> alternative.
    pub alternatives: OrderedMap<OrderedMap<Option<String>>>,
    /// category -> default alternative.
    pub default_alternatives: OrderedMap<Option<String>>,
}

impl TaxonomyDocument {
    pub fn from_json_str(json: &str) -> Result<Self, TaxonomyError> {
        serde_json::from_str(json).map_err(|e| TaxonomyError::Parse {
            source_name: "<json>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, TaxonomyError> {
        toml::from_str(toml_str).map_err(|e| TaxonomyError::Parse {
            source_name: "<toml>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, TaxonomyError> {
        serde_json::to_string_pretty(self).map_err(|e| TaxonomyError::Parse {
            source_name: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_declaration_order() {
        let doc = TaxonomyDocument::from_json_str(
            r#"{"algorithms": {"Zeta": {"Z": ["z1"]}, "Alpha": {"B": ["b"], "A": ["a"]}}}"#,
        )
        .unwrap();
        let categories: Vec<&str> = doc.algorithms.keys().collect();
        assert_eq!(categories, vec!["Zeta", "Alpha"]);
        let subs: Vec<&str> = doc.algorithms.get("Alpha").unwrap().keys().collect();
        assert_eq!(subs, vec!["B", "A"]);
    }

    #[test]
    fn toml_keeps_declaration_order_and_omits_null() {
        let doc = TaxonomyDocument::from_toml_str(
            r#"
[algorithms.Cipher]
RC4 = ["rc4"]
DES = ["des", "3des"]

[default_alternatives]
Cipher = "aes-gcm"
"#,
        )
        .unwrap();
        let subs: Vec<&str> = doc.algorithms.get("Cipher").unwrap().keys().collect();
        assert_eq!(subs, vec!["RC4", "DES"]);
        assert_eq!(
            doc.default_alternatives.get("Cipher"),
            Some(&Some("aes-gcm".to_string()))
        );
        assert!(doc.modes.is_empty());
    }

    #[test]
    fn null_alternative_is_none() {
        let doc = TaxonomyDocument::from_json_str(
            r#"{"alternatives": {"Hash": {"MD": null}}}"#,
        )
        .unwrap();
        assert_eq!(doc.alternatives.get("Hash").unwrap().get("MD"), Some(&None));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = TaxonomyDocument::from_json_str(r#"{"algorithms": ["#).unwrap_err();
        assert!(matches!(err, TaxonomyError::Parse { .. }));
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("a", 3);
        let entries: Vec<(&str, &i32)> = map.iter().collect();
        assert_eq!(entries, vec![("a", &3), ("b", &2)]);
    }
}
