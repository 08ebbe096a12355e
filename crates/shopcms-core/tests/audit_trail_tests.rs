#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{at, settings, MemorySettings};
use proptest::prelude::*;
use serde_json::{json, Value};
use shopcms_core::audit::parse_lines;
use shopcms_core::clock::{fixed_clock, Clock};
use shopcms_core::{compute_diff, AuditTrail, CmsError, SettingsRepository};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Clock advancing one day per call from 2026-01-01
fn daily_clock() -> Clock {
    let day = Arc::new(AtomicI64::new(0));
    Arc::new(move || {
        let n = day.fetch_add(1, Ordering::SeqCst);
        at("2026-01-01T00:00:00Z") + chrono::Duration::days(n)
    })
}

#[test]
fn test_save_appends_one_line_per_change() {
    let trail = AuditTrail::new(MemorySettings::default()).with_clock(daily_clock());

    let first = trail
        .save_settings("acme", &settings(json!({ "theme": "base" })))
        .unwrap();
    assert!(first.appended());
    trail
        .save_settings("acme", &settings(json!({ "theme": "base" })))
        .unwrap();
    trail
        .save_settings("acme", &settings(json!({ "theme": "dark", "currency": "EUR" })))
        .unwrap();

    let history = trail.diff_history("acme").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(Value::Object(history[0].diff.clone()), json!({ "theme": "base" }));
    assert_eq!(
        Value::Object(history[1].diff.clone()),
        json!({ "theme": "dark", "currency": "EUR" })
    );
    assert!(history[0].timestamp < history[1].timestamp);
}

#[test]
fn test_settings_are_written_even_without_change() {
    let repo = MemorySettings::default();
    repo.write_settings_atomic("acme", &settings(json!({ "theme": "base", "x": null })))
        .unwrap();
    let trail = AuditTrail::new(repo);

    let outcome = trail
        .save_settings("acme", &settings(json!({ "theme": "base" })))
        .unwrap();
    assert!(!outcome.appended());
    assert_eq!(
        trail.load_settings("acme").unwrap(),
        settings(json!({ "theme": "base" }))
    );
}

#[test]
fn test_removed_key_is_logged_as_null() {
    let trail = AuditTrail::new(MemorySettings::default())
        .with_clock(fixed_clock(at("2026-01-01T00:00:00Z")));
    trail
        .save_settings("acme", &settings(json!({ "theme": "base", "logo": "a.png" })))
        .unwrap();
    let outcome = trail
        .save_settings("acme", &settings(json!({ "theme": "base" })))
        .unwrap();
    assert_eq!(Value::Object(outcome.diff), json!({ "logo": null }));
}

#[test]
fn test_revert_replays_and_appends() {
    let trail = AuditTrail::new(MemorySettings::default()).with_clock(daily_clock());
    trail
        .save_settings("acme", &settings(json!({ "theme": "a" })))
        .unwrap();
    trail
        .save_settings("acme", &settings(json!({ "theme": "b", "logo": "x.png" })))
        .unwrap();
    trail
        .save_settings("acme", &settings(json!({ "theme": "c" })))
        .unwrap();

    let restored = trail.revert("acme", at("2026-01-02T00:00:00Z")).unwrap();
    assert_eq!(restored, settings(json!({ "theme": "b", "logo": "x.png" })));
    assert_eq!(trail.load_settings("acme").unwrap(), restored);

    let history = trail.diff_history("acme").unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(
        Value::Object(history[3].diff.clone()),
        json!({ "theme": "b", "logo": "x.png" })
    );
}

#[test]
fn test_revert_keeps_keys_outside_the_log() {
    let repo = MemorySettings::default();
    // seeded before the audit trail existed
    repo.write_settings_atomic("acme", &settings(json!({ "currency": "EUR" })))
        .unwrap();
    let trail = AuditTrail::new(repo).with_clock(daily_clock());
    trail
        .save_settings("acme", &settings(json!({ "currency": "EUR", "theme": "a" })))
        .unwrap();
    trail
        .save_settings("acme", &settings(json!({ "currency": "EUR", "theme": "b" })))
        .unwrap();

    let restored = trail.revert("acme", at("2026-01-01T00:00:00Z")).unwrap();
    assert_eq!(restored, settings(json!({ "currency": "EUR", "theme": "a" })));
}

#[test]
fn test_revert_before_first_entry() {
    let trail = AuditTrail::new(MemorySettings::default()).with_clock(daily_clock());
    trail
        .save_settings("acme", &settings(json!({ "theme": "a" })))
        .unwrap();

    let err = trail.revert("acme", at("2025-06-01T00:00:00Z")).unwrap_err();
    assert!(matches!(err, CmsError::RevertTargetNotFound { .. }));
    assert_eq!(trail.repository().line_count("acme"), 1);
}

#[test]
fn test_history_between_bounds() {
    let trail = AuditTrail::new(MemorySettings::default()).with_clock(daily_clock());
    for theme in ["a", "b", "c"] {
        trail
            .save_settings("acme", &settings(json!({ "theme": theme })))
            .unwrap();
    }
    let slice = trail
        .diff_history_between(
            "acme",
            Some(at("2026-01-02T00:00:00Z")),
            Some(at("2026-01-02T23:59:59Z")),
        )
        .unwrap();
    assert_eq!(slice.len(), 1);
    assert_eq!(slice[0].diff["theme"], json!("b"));
}

#[test]
fn test_unknown_shop_has_no_history() {
    let trail = AuditTrail::new(MemorySettings::default());
    assert!(trail.diff_history("nobody").unwrap().is_empty());
}

fn arb_settings() -> impl Strategy<Value = serde_json::Map<String, Value>> {
    prop::collection::btree_map("[a-e]", prop_oneof![Just(Value::Null), any::<i32>().prop_map(Value::from), "[a-z]{0,3}".prop_map(Value::from)], 0..5)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_diff_of_self_is_empty(s in arb_settings()) {
        prop_assert!(compute_diff(&s, &s).is_empty());
    }

    #[test]
    fn prop_n_valid_lines_and_one_corrupt(n in 0usize..8, corrupt_at in 0usize..8) {
        let mut lines: Vec<String> = (0..n)
            .map(|i| format!(r#"{{"timestamp":"2026-01-01T00:00:0{i}.000Z","diff":{{"k":{i}}}}}"#))
            .collect();
        lines.insert(corrupt_at.min(n), "{\"timestamp\":".to_string());

        let (entries, dropped) = parse_lines(&lines);
        prop_assert_eq!(entries.len(), n);
        prop_assert_eq!(dropped, 1);
        for (i, entry) in entries.iter().enumerate() {
            prop_assert_eq!(&entry.diff["k"], &json!(i));
        }
    }
}
