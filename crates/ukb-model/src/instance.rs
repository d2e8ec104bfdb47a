//! Instance-description lookup: field id to instance index to text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Instance descriptions supplied by the operator, appended to planned
/// column names. Keys are decimal strings, matching the on-disk JSON shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceMap(BTreeMap<String, BTreeMap<String, String>>);

impl InstanceMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Description for a (field, instance) pair, when configured.
    pub fn description(&self, field: u32, instance: u32) -> Option<&str> {
        self.0
            .get(&field.to_string())?
            .get(&instance.to_string())
            .map(String::as_str)
    }

    pub fn insert(&mut self, field: u32, instance: u32, description: String) {
        self.0
            .entry(field.to_string())
            .or_default()
            .insert(instance.to_string(), description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_numeric_keys() {
        let mut map = InstanceMap::default();
        map.insert(3, 1, "First repeat assessment visit (2012-13)".to_string());

        assert_eq!(
            map.description(3, 1),
            Some("First repeat assessment visit (2012-13)")
        );
        assert_eq!(map.description(3, 0), None);
        assert_eq!(map.description(4, 1), None);
    }

    #[test]
    fn deserializes_from_plain_object() {
        let map: InstanceMap =
            serde_json::from_str(r#"{"3": {"0": "Initial visit", "1": "Repeat visit"}}"#).unwrap();
        assert_eq!(map.description(3, 1), Some("Repeat visit"));
    }
}
