//! Loosely typed components stored as TOML tables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named TOML values attached to one entity.
///
/// Effect layers publish cosmetic state here (the wing pose, for instance)
/// so a renderer or a test can read it without linking the layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentTable(BTreeMap<String, toml::Value>);

impl ComponentTable {
    pub fn get(&self, name: &str) -> Option<&toml::Value> {
        self.0.get(name)
    }

    /// Replace `name` wholesale, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: toml::Value) -> Option<toml::Value> {
        self.0.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<toml::Value> {
        self.0.remove(name)
    }

    /// Names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_and_reports_previous() {
        let mut table = ComponentTable::default();
        assert!(table.insert("wings", toml::Value::Boolean(false)).is_none());

        let old = table.insert("wings", toml::Value::Boolean(true));
        assert_eq!(old, Some(toml::Value::Boolean(false)));
        assert_eq!(table.get("wings").and_then(|v| v.as_bool()), Some(true));
    }

    #[test]
    fn names_are_sorted() {
        let mut table = ComponentTable::default();
        table.insert("wings", toml::Value::Integer(1));
        table.insert("aura", toml::Value::Integer(2));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["aura", "wings"]);

        table.remove("aura");
        assert_eq!(table.names().count(), 1);
    }
}
