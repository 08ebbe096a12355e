use chrono::{DateTime, Utc};
use serde_json::Value;
use shopcms_core::ShopSettings;
use shopcms_store::{FsPageStore, FsSettingsStore, ShopLayout};
use tempfile::TempDir;

/// Layout over a fresh temp directory; keep the `TempDir` alive for the test
#[allow(dead_code)]
pub fn temp_layout() -> (TempDir, ShopLayout) {
    let dir = TempDir::new().unwrap();
    let layout = ShopLayout::new(dir.path());
    (dir, layout)
}

#[allow(dead_code)]
pub fn settings_store() -> (TempDir, FsSettingsStore) {
    let (dir, layout) = temp_layout();
    (dir, FsSettingsStore::new(layout))
}

#[allow(dead_code)]
pub fn page_store() -> (TempDir, FsPageStore) {
    let (dir, layout) = temp_layout();
    (dir, FsPageStore::new(layout))
}

#[allow(dead_code)]
pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

#[allow(dead_code)]
pub fn settings(value: Value) -> ShopSettings {
    value.as_object().cloned().unwrap()
}
