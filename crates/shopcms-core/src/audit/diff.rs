//! Shallow settings diff
//!
//! Settings sub-objects are replaced wholesale on edit, so comparing
//! top-level keys loses nothing. A `null` value in a diff means the key was
//! removed; a `null` in settings is treated as an absent key.

use serde_json::{Map, Value};

/// A shop's settings document
pub type ShopSettings = Map<String, Value>;

/// Changed top-level keys with their new values; `null` marks a removal
pub type SettingsDiff = Map<String, Value>;

fn present<'a>(settings: &'a ShopSettings, key: &str) -> Option<&'a Value> {
    settings.get(key).filter(|v| !v.is_null())
}

/// Diff two settings states
pub fn compute_diff(old: &ShopSettings, new: &ShopSettings) -> SettingsDiff {
    let mut diff = SettingsDiff::new();
    for (key, value) in new {
        if value.is_null() {
            continue;
        }
        if present(old, key) != Some(value) {
            diff.insert(key.clone(), value.clone());
        }
    }
    for key in old.keys() {
        if present(old, key).is_some() && present(new, key).is_none() {
            diff.insert(key.clone(), Value::Null);
        }
    }
    diff
}

/// Overwrite top-level keys from `diff`; `null` removes the key
pub fn apply_diff(settings: &mut ShopSettings, diff: &SettingsDiff) {
    for (key, value) in diff {
        if value.is_null() {
            settings.remove(key);
        } else {
            settings.insert(key.clone(), value.clone());
        }
    }
}
