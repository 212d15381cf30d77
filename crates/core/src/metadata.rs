//! Metadata - Opaque key-value attachment
//!
//! Free-form `metadata`/`details` payloads travel with most records. The
//! engine stores and returns them verbatim and never branches on their
//! contents; this type makes that contract explicit.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Opaque string-keyed JSON map.
///
/// Uses a BTreeMap so serialization order is deterministic, which keeps
/// stored rows and audit records stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    /// Create an empty metadata map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key-value pair, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_metadata() {
        let meta = Metadata::new();
        assert!(meta.is_empty());
        assert_eq!(meta.len(), 0);
        assert!(meta.get("anything").is_none());
    }

    #[test]
    fn test_insert_and_get() {
        let mut meta = Metadata::new();
        meta.insert("origin", json!("import"));
        meta.insert("weight_kg", json!(12.5));

        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("origin"), Some(&json!("import")));
        assert_eq!(meta.get("weight_kg"), Some(&json!(12.5)));
    }

    #[test]
    fn test_serde_is_transparent() {
        let mut meta = Metadata::new();
        meta.insert("b", json!(2));
        meta.insert("a", json!(1));

        let json = serde_json::to_string(&meta).unwrap();
        // BTreeMap keeps keys sorted
        assert_eq!(json, r#"{"a":1,"b":2}"#);

        let parsed: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, meta);
    }
}
