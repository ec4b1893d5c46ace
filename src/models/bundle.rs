//! SecretBundle: an ordered set of named secrets
//!
//! The bundle serializes as a flat JSON object whose members appear in
//! insertion order, e.g. `{"API_KEY":"abc123","DB_URL":"postgres://x"}`.
//! Secret values are zeroized when the bundle is dropped.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::error::{KeyvaultError, KeyvaultResult};

/// An ordered mapping from secret key to secret value
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretBundle {
    entries: Vec<(String, String)>,
}

impl SecretBundle {
    /// Create an empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bundle from key/value pairs, rejecting empty keys
    ///
    /// A repeated key overwrites the earlier value but keeps its position.
    pub fn from_pairs<I, K, V>(pairs: I) -> KeyvaultResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut bundle = Self::new();
        for (key, value) in pairs {
            bundle.insert(key, value)?;
        }
        Ok(bundle)
    }

    /// Insert or replace a secret, returning the previous value if any
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> KeyvaultResult<Option<String>> {
        let key = key.into();
        if key.is_empty() {
            return Err(KeyvaultError::Validation(
                "Secret key must not be empty".to_string(),
            ));
        }

        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Ok(Some(std::mem::replace(existing, value))),
            None => {
                self.entries.push((key, value));
                Ok(None)
            }
        }
    }

    /// Look up a secret value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a secret, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Number of secrets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bundle has no secrets
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Drop for SecretBundle {
    fn drop(&mut self) {
        for (_, value) in self.entries.iter_mut() {
            value.zeroize();
        }
    }
}

// Never print secret values
impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBundle")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Serialize for SecretBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct BundleVisitor;

impl<'de> Visitor<'de> for BundleVisitor {
    type Value = SecretBundle;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping secret names to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut bundle = SecretBundle {
            entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            if key.is_empty() {
                return Err(de::Error::custom("secret key must not be empty"));
            }
            if bundle.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate secret key '{}'", key)));
            }
            bundle.entries.push((key, value));
        }
        Ok(bundle)
    }
}

impl<'de> Deserialize<'de> for SecretBundle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BundleVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let bundle =
            SecretBundle::from_pairs([("ZED", "1"), ("ALPHA", "2"), ("MIDDLE", "3")]).unwrap();
        let keys: Vec<&str> = bundle.keys().collect();
        assert_eq!(keys, vec!["ZED", "ALPHA", "MIDDLE"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut bundle = SecretBundle::from_pairs([("A", "1"), ("B", "2")]).unwrap();
        let previous = bundle.insert("A", "updated").unwrap();

        assert_eq!(previous.as_deref(), Some("1"));
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.iter().next(), Some(("A", "updated")));
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut bundle = SecretBundle::new();
        let err = bundle.insert("", "value").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_remove() {
        let mut bundle = SecretBundle::from_pairs([("A", "1"), ("B", "2")]).unwrap();
        assert_eq!(bundle.remove("A").as_deref(), Some("1"));
        assert_eq!(bundle.remove("A"), None);
        assert_eq!(bundle.len(), 1);
        assert!(bundle.contains_key("B"));
    }

    #[test]
    fn test_serialize_compact_json() {
        let bundle =
            SecretBundle::from_pairs([("API_KEY", "abc123"), ("DB_URL", "postgres://x")]).unwrap();
        let json = serde_json::to_string(&bundle).unwrap();
        assert_eq!(json, r#"{"API_KEY":"abc123","DB_URL":"postgres://x"}"#);
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        let bundle: SecretBundle = serde_json::from_str(r#"{"b":"2","a":"1"}"#).unwrap();
        let keys: Vec<&str> = bundle.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(bundle.get("a"), Some("1"));
    }

    #[test]
    fn test_deserialize_rejects_non_string_values() {
        assert!(serde_json::from_str::<SecretBundle>(r#"{"PORT":8080}"#).is_err());
        assert!(serde_json::from_str::<SecretBundle>(r#"["A","B"]"#).is_err());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_and_empty_keys() {
        assert!(serde_json::from_str::<SecretBundle>(r#"{"A":"1","A":"2"}"#).is_err());
        assert!(serde_json::from_str::<SecretBundle>(r#"{"":"1"}"#).is_err());
    }

    #[test]
    fn test_debug_hides_values() {
        let bundle = SecretBundle::from_pairs([("TOKEN", "super-secret")]).unwrap();
        let debug = format!("{:?}", bundle);
        assert!(debug.contains("TOKEN"));
        assert!(!debug.contains("super-secret"));
    }
}
