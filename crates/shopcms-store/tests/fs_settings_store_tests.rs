#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{at, settings, settings_store};
use serde_json::json;
use shopcms_core::clock::fixed_clock;
use shopcms_core::{AuditTrail, CmsError, SettingsRepository};
use std::fs;

#[test]
fn test_missing_shop_reads_empty() {
    let (_dir, store) = settings_store();
    assert!(store.load_settings("acme").unwrap().is_empty());
    assert!(store.load_audit_lines("acme").unwrap().is_empty());
}

#[test]
fn test_settings_file_round_trip() {
    let (_dir, store) = settings_store();
    let value = settings(json!({ "theme": "dark", "currency": "EUR" }));
    store.write_settings_atomic("acme", &value).unwrap();
    assert_eq!(store.load_settings("acme").unwrap(), value);
}

#[test]
fn test_non_object_settings_file_is_serialization_error() {
    let (_dir, store) = settings_store();
    let path = store.layout().settings_path("acme").unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "[1, 2]").unwrap();

    let err = store.load_settings("acme").unwrap_err();
    assert!(matches!(err, CmsError::Serialization { .. }));
}

#[test]
fn test_invalid_shop_id_is_rejected_before_io() {
    let (dir, store) = settings_store();
    let err = store.load_settings("../escape").unwrap_err();
    assert!(matches!(err, CmsError::InvalidShopId { .. }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_save_appends_one_line_per_change() {
    let (_dir, store) = settings_store();
    let trail = AuditTrail::new(store.clone()).with_clock(fixed_clock(at("2026-03-01T10:00:00.250Z")));

    trail
        .save_settings("acme", &settings(json!({ "theme": "base" })))
        .unwrap();
    let noop = trail
        .save_settings("acme", &settings(json!({ "theme": "base" })))
        .unwrap();
    assert!(!noop.appended());

    let log = fs::read_to_string(store.layout().audit_log_path("acme").unwrap()).unwrap();
    assert_eq!(
        log,
        "{\"timestamp\":\"2026-03-01T10:00:00.250Z\",\"diff\":{\"theme\":\"base\"}}\n"
    );
}

#[test]
fn test_corrupt_line_on_disk_is_skipped() {
    let (_dir, store) = settings_store();
    let path = store.layout().audit_log_path("acme").unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        concat!(
            "{\"timestamp\":\"2026-01-01T00:00:00.000Z\",\"diff\":{\"theme\":\"a\"}}\n",
            "{not json\n",
            "{\"timestamp\":\"2026-01-02T00:00:00.000Z\",\"diff\":{\"theme\":\"b\"}}\n",
        ),
    )
    .unwrap();

    let entries = AuditTrail::new(store).diff_history("acme").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].diff["theme"], json!("a"));
    assert_eq!(entries[1].diff["theme"], json!("b"));
}

#[test]
fn test_non_utf8_line_on_disk_is_skipped() {
    let (_dir, store) = settings_store();
    let path = store.layout().audit_log_path("acme").unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut bytes =
        b"{\"timestamp\":\"2026-01-01T00:00:00.000Z\",\"diff\":{\"theme\":\"a\"}}\n".to_vec();
    bytes.extend_from_slice(&[b'{', 0xc3, 0x28, 0xff, b'\n']);
    bytes.extend_from_slice(
        b"{\"timestamp\":\"2026-01-02T00:00:00.000Z\",\"diff\":{\"theme\":\"b\"}}\n",
    );
    fs::write(&path, bytes).unwrap();

    assert_eq!(store.load_audit_lines("acme").unwrap().len(), 3);
    let entries = AuditTrail::new(store).diff_history("acme").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].diff["theme"], json!("b"));
}

#[test]
fn test_save_after_torn_tail_starts_a_new_line() {
    let (_dir, store) = settings_store();
    let path = store.layout().audit_log_path("acme").unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        concat!(
            "{\"timestamp\":\"2025-12-31T00:00:00.000Z\",\"diff\":{\"logo\":\"a.png\"}}\n",
            "{\"timestamp\":\"2026-01-01T00:0",
        ),
    )
    .unwrap();

    let trail = AuditTrail::new(store.clone()).with_clock(fixed_clock(at("2026-01-02T00:00:00Z")));
    let outcome = trail
        .save_settings("acme", &settings(json!({ "theme": "dark" })))
        .unwrap();
    assert!(outcome.appended());

    assert_eq!(store.load_audit_lines("acme").unwrap().len(), 3);
    let entries = trail.diff_history("acme").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].diff["theme"], json!("dark"));
}

#[test]
fn test_revert_on_disk_appends_forward_entry() {
    let (_dir, store) = settings_store();
    let first = AuditTrail::new(store.clone()).with_clock(fixed_clock(at("2026-01-01T00:00:00Z")));
    first
        .save_settings("acme", &settings(json!({ "theme": "a", "logo": "a.png" })))
        .unwrap();
    let second = AuditTrail::new(store.clone()).with_clock(fixed_clock(at("2026-01-02T00:00:00Z")));
    second
        .save_settings("acme", &settings(json!({ "theme": "b" })))
        .unwrap();

    let restored = second.revert("acme", at("2026-01-01T12:00:00Z")).unwrap();

    assert_eq!(restored, settings(json!({ "theme": "a", "logo": "a.png" })));
    assert_eq!(store.load_settings("acme").unwrap(), restored);
    assert_eq!(store.load_audit_lines("acme").unwrap().len(), 3);
}
