use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attr::{Attribute, AttributeScope, scope_of};

/// The set of attributes in effect at a point or across a span, keyed by
/// attribute key. A `null` value is the unset marker: applied to existing
/// content it removes the key. All operations return a new `Style`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style {
    entries: BTreeMap<String, Value>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(attr: &Attribute) -> Self {
        Self::new().put(attr)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True iff an attribute with the same key and value is present.
    pub fn contains(&self, attr: &Attribute) -> bool {
        match attr.value() {
            Some(value) => self.entries.get(attr.key()) == Some(value),
            None => self.entries.get(attr.key()) == Some(&Value::Null),
        }
    }

    /// True iff an attribute with the same key is present, regardless of
    /// value. Toggle logic uses this to detect "uniformly set" before
    /// deciding between set-for-all and unset-for-all.
    pub fn contains_same(&self, attr: &Attribute) -> bool {
        self.entries.contains_key(attr.key())
    }

    pub fn put(&self, attr: &Attribute) -> Self {
        let mut entries = self.entries.clone();
        let value = attr.value().cloned().unwrap_or(Value::Null);
        entries.insert(attr.key().to_string(), value);
        Self { entries }
    }

    pub fn remove(&self, key: &str) -> Self {
        let mut entries = self.entries.clone();
        entries.remove(key);
        Self { entries }
    }

    /// Keys in `other` override keys in `self`; a null value removes the
    /// key entirely.
    pub fn merge(&self, other: &Style) -> Self {
        let mut entries = self.entries.clone();
        for (key, value) in &other.entries {
            if value.is_null() {
                entries.remove(key);
            } else {
                entries.insert(key.clone(), value.clone());
            }
        }
        Self { entries }
    }

    /// Entries whose key belongs to the given scope.
    pub fn scoped(&self, scope: AttributeScope) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(key, _)| scope_of(key.as_str()) == Some(scope))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { entries }
    }

    /// Attribute composition: `other` wins over `base`. Unset markers are
    /// kept when the result patches existing content (retain over retain)
    /// and dropped when it lands on fresh content (retain over insert).
    pub fn compose(base: &Style, other: &Style, keep_null: bool) -> Self {
        let mut entries = base.entries.clone();
        for (key, value) in &other.entries {
            entries.insert(key.clone(), value.clone());
        }
        if !keep_null {
            entries.retain(|_, value| !value.is_null());
        }
        Self { entries }
    }

    /// The minimal patch turning `a`'s entries into `b`'s, using unset
    /// markers for removals.
    pub fn diff(a: &Style, b: &Style) -> Self {
        let mut entries = BTreeMap::new();
        for key in a.entries.keys().chain(b.entries.keys()) {
            if entries.contains_key(key) {
                continue;
            }
            match (a.entries.get(key), b.entries.get(key)) {
                (Some(old), Some(new)) if old == new => {}
                (_, Some(new)) => {
                    entries.insert(key.clone(), new.clone());
                }
                (Some(_), None) => {
                    entries.insert(key.clone(), Value::Null);
                }
                (None, None) => {}
            }
        }
        Self { entries }
    }

    /// The patch restoring `base`'s values for every key `patch` touched.
    pub fn invert(patch: &Style, base: &Style) -> Self {
        let mut entries = BTreeMap::new();
        for (key, base_value) in &base.entries {
            if let Some(patch_value) = patch.entries.get(key) {
                if patch_value != base_value {
                    entries.insert(key.clone(), base_value.clone());
                }
            }
        }
        for (key, patch_value) in &patch.entries {
            if !base.entries.contains_key(key) && !patch_value.is_null() {
                entries.insert(key.clone(), Value::Null);
            }
        }
        Self { entries }
    }

    /// Entries present with equal values in both styles. This is the
    /// uniformity primitive behind "effective style at a selection": a key
    /// with differing values across runs drops out of the result.
    pub fn intersect(a: &Style, b: &Style) -> Self {
        let entries = a
            .entries
            .iter()
            .filter(|(key, value)| !value.is_null() && b.entries.get(*key) == Some(*value))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { entries }
    }
}
