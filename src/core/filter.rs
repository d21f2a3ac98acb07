//! Filter values and the per-table filter set

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw value that list pages use to mean "no filter"
pub const ALL: &str = "all";

/// Current value of a named filter
///
/// A `Disabled` filter never narrows the result set, whatever predicate is
/// registered for it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FilterValue {
    Active(String),
    #[default]
    Disabled,
}

impl FilterValue {
    pub fn is_active(&self) -> bool {
        matches!(self, FilterValue::Active(_))
    }

    /// The stored value when active
    pub fn as_active(&self) -> Option<&str> {
        match self {
            FilterValue::Active(v) => Some(v),
            FilterValue::Disabled => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() || value == ALL {
            FilterValue::Disabled
        } else {
            FilterValue::Active(value.to_string())
        }
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        if value.trim().is_empty() || value == ALL {
            FilterValue::Disabled
        } else {
            FilterValue::Active(value)
        }
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        FilterValue::from(value.as_str())
    }
}

impl From<Option<&str>> for FilterValue {
    fn from(value: Option<&str>) -> Self {
        value.map(FilterValue::from).unwrap_or_default()
    }
}

impl From<Option<String>> for FilterValue {
    fn from(value: Option<String>) -> Self {
        value.map(FilterValue::from).unwrap_or_default()
    }
}

impl From<FilterValue> for Option<String> {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Active(v) => Some(v),
            FilterValue::Disabled => None,
        }
    }
}

/// Filter values keyed by filter name, in the order they were first set
///
/// Keys without a registered predicate are kept so UI state can be seeded
/// before the predicate is wired.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    values: IndexMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value; returns `true` when the stored value changed
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> bool {
        let key = key.into();
        let value = value.into();
        match self.values.get(&key) {
            Some(current) if *current == value => false,
            // An unseen key set to Disabled changes nothing observable
            None if !value.is_active() => {
                self.values.insert(key, value);
                false
            }
            _ => {
                self.values.insert(key, value);
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Active value of a filter, if any
    pub fn active(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(FilterValue::as_active)
    }

    /// Iterate over active filters only
    pub fn iter_active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter_map(|(k, v)| v.as_active().map(|v| (k.as_str(), v)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Disable every filter; returns `true` if any was active
    pub fn clear(&mut self) -> bool {
        let had_active = self.values.values().any(FilterValue::is_active);
        for value in self.values.values_mut() {
            *value = FilterValue::Disabled;
        }
        had_active
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FilterSet
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for (k, v) in iter {
            set.set(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_disable() {
        assert_eq!(FilterValue::from("all"), FilterValue::Disabled);
        assert_eq!(FilterValue::from(""), FilterValue::Disabled);
        assert_eq!(FilterValue::from("   "), FilterValue::Disabled);
        assert_eq!(FilterValue::from(None::<&str>), FilterValue::Disabled);
    }

    #[test]
    fn test_values_stored_verbatim() {
        assert_eq!(
            FilterValue::from(" Active "),
            FilterValue::Active(" Active ".to_string())
        );
        // Only the exact sentinel disables
        assert!(FilterValue::from("All").is_active());
    }

    #[test]
    fn test_set_reports_changes() {
        let mut set = FilterSet::new();
        assert!(set.set("status", "active"));
        assert!(!set.set("status", "active"));
        assert!(set.set("status", "all"));
        assert!(!set.set("status", ""));
        assert!(!set.set("type", "all"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_iter_active_skips_disabled() {
        let set: FilterSet = [("status", "active"), ("type", "all"), ("city", "Dubai")]
            .into_iter()
            .collect();
        let active: Vec<_> = set.iter_active().collect();
        assert_eq!(active, vec![("status", "active"), ("city", "Dubai")]);
    }

    #[test]
    fn test_clear() {
        let mut set: FilterSet = [("status", "active")].into_iter().collect();
        assert!(set.clear());
        assert!(!set.clear());
        assert_eq!(set.active("status"), None);
    }

    #[test]
    fn test_serde_uses_plain_strings() {
        let set: FilterSet = [("status", "active"), ("type", "all")].into_iter().collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!({"status": "active", "type": null}));
    }
}
