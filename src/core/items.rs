//! Context items carried by log events
//!
//! This module provides:
//! - `ItemValue`: a single structured value
//! - `ContextItems`: the unique-key map attached to every `LogEvent`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Value type for context items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemValue::String(s) => write!(f, "{}", s),
            ItemValue::Int(i) => write!(f, "{}", i),
            ItemValue::Float(fl) => write!(f, "{}", fl),
            ItemValue::Bool(b) => write!(f, "{}", b),
            ItemValue::Null => write!(f, "null"),
        }
    }
}

impl ItemValue {
    /// Convert to serde_json::Value for JSON rendering
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            ItemValue::String(s) => serde_json::Value::String(s.clone()),
            ItemValue::Int(i) => serde_json::Value::Number((*i).into()),
            ItemValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ItemValue::Bool(b) => serde_json::Value::Bool(*b),
            ItemValue::Null => serde_json::Value::Null,
        }
    }
}

impl From<String> for ItemValue {
    fn from(s: String) -> Self {
        ItemValue::String(s)
    }
}

impl From<&str> for ItemValue {
    fn from(s: &str) -> Self {
        ItemValue::String(s.to_string())
    }
}

impl From<i64> for ItemValue {
    fn from(i: i64) -> Self {
        ItemValue::Int(i)
    }
}

impl From<i32> for ItemValue {
    fn from(i: i32) -> Self {
        ItemValue::Int(i as i64)
    }
}

impl From<u32> for ItemValue {
    fn from(i: u32) -> Self {
        ItemValue::Int(i as i64)
    }
}

impl From<f64> for ItemValue {
    fn from(f: f64) -> Self {
        ItemValue::Float(f)
    }
}

impl From<bool> for ItemValue {
    fn from(b: bool) -> Self {
        ItemValue::Bool(b)
    }
}

impl<T: Into<ItemValue>> From<Option<T>> for ItemValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ItemValue::Null)
    }
}

/// Key/value items attached to a log event. Keys are unique; inserting an
/// existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextItems {
    items: HashMap<String, ItemValue>,
}

impl ContextItems {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Add an item, builder style
    #[must_use]
    pub fn with_item<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ItemValue>,
    {
        self.items.insert(key.into(), value.into());
        self
    }

    /// Add an item (mutable version)
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<ItemValue>,
    {
        self.items.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ItemValue> {
        self.items.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ItemValue)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merge `other` into these items. Values from `other` win on key collision.
    pub fn merge(&mut self, other: &ContextItems) {
        for (key, value) in other.items.iter() {
            self.items.insert(key.clone(), value.clone());
        }
    }

    /// Return these items layered over `base`: keys present here take priority.
    #[must_use]
    pub fn merged_under(&self, base: &ContextItems) -> ContextItems {
        let mut merged = base.clone();
        merged.merge(self);
        merged
    }

    /// Format items as key=value pairs, sorted by key
    pub fn format_items(&self) -> String {
        let mut pairs: Vec<_> = self.items.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ContextItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_items())
    }
}

impl<K, V> FromIterator<(K, V)> for ContextItems
where
    K: Into<String>,
    V: Into<ItemValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut items = ContextItems::new();
        for (key, value) in iter {
            items.insert(key, value);
        }
        items
    }
}

impl From<HashMap<String, ItemValue>> for ContextItems {
    fn from(items: HashMap<String, ItemValue>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_creation() {
        let items = ContextItems::new();
        assert!(items.is_empty());
    }

    #[test]
    fn test_items_with_values() {
        let items = ContextItems::new()
            .with_item("user_id", 123)
            .with_item("username", "john_doe")
            .with_item("active", true);

        assert_eq!(items.len(), 3);
        assert_eq!(items.get("user_id"), Some(&ItemValue::Int(123)));
    }

    #[test]
    fn test_repeated_key_overwrites() {
        let mut items = ContextItems::new().with_item("k", "first");
        items.insert("k", "second");

        assert_eq!(items.len(), 1);
        assert_eq!(items.get("k"), Some(&ItemValue::from("second")));
    }

    #[test]
    fn test_format_items_is_sorted() {
        let items = ContextItems::new()
            .with_item("key2", 42)
            .with_item("key1", "value1");

        assert_eq!(items.format_items(), "key1=value1 key2=42");
    }

    #[test]
    fn test_merge_new_wins() {
        let mut old = ContextItems::new()
            .with_item("shared", "old")
            .with_item("only_old", 1);
        let new = ContextItems::new()
            .with_item("shared", "new")
            .with_item("only_new", 2);

        old.merge(&new);

        assert_eq!(old.len(), 3);
        assert_eq!(old.get("shared"), Some(&ItemValue::from("new")));
    }

    #[test]
    fn test_merged_under_receiver_wins() {
        let logger_items = ContextItems::new()
            .with_item("service", "api")
            .with_item("key", "logger_value");
        let call_items = ContextItems::new().with_item("key", "call_value");

        let merged = call_items.merged_under(&logger_items);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("key"), Some(&ItemValue::from("call_value")));
        assert_eq!(merged.get("service"), Some(&ItemValue::from("api")));
    }

    #[test]
    fn test_option_maps_to_null() {
        let missing: Option<i64> = None;
        assert_eq!(ItemValue::from(missing), ItemValue::Null);
        assert_eq!(ItemValue::Null.to_string(), "null");
    }
}
