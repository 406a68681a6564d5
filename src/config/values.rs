//! The value table threaded through a run.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Mapping of variable name to value.
///
/// Seeded from the values supplied on the command line, extended by
/// `CreateVar` steps and by `Runner` steps that declare a `ValueKey`.
/// Ordered so that resume files are written deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTable(BTreeMap<String, String>);

impl ValueTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Store a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Parse a JSON object of strings, as passed with `--vals`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<BTreeMap<String, String>> for ValueTable {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValueTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ValueTable {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites() {
        let mut vals = ValueTable::new();
        vals.insert("Region", "westus");
        vals.insert("Region", "eastus");
        assert_eq!(vals.get("Region"), Some("eastus"));
        assert_eq!(vals.len(), 1);
    }

    #[test]
    fn from_json_parses_object() {
        let vals = ValueTable::from_json(r#"{"Subscription":"sub","Region":"westus"}"#).unwrap();
        assert_eq!(vals.get("Subscription"), Some("sub"));
        assert!(vals.contains_key("Region"));
    }

    #[test]
    fn from_json_rejects_non_string_values() {
        assert!(ValueTable::from_json(r#"{"Retries": 3}"#).is_err());
    }

    #[test]
    fn serializes_as_plain_object_in_key_order() {
        let vals: ValueTable = [("b", "2"), ("a", "1")].into_iter().collect();
        let json = serde_json::to_string(&vals).unwrap();
        assert_eq!(json, r#"{"a":"1","b":"2"}"#);
    }
}
