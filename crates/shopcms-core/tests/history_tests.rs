#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use serde_json::json;
use shopcms_core::{CmsError, GridCols, HistoryState, Node, TreeEdit};

mod common;

fn snapshot(ids: &[String]) -> Vec<Node> {
    ids.iter().map(|id| Node::new(id.clone(), "Text")).collect()
}

#[test]
fn test_commit_after_undo_clears_redo() {
    let history = HistoryState::new(snapshot(&["a".to_string()]))
        .commit(snapshot(&["b".to_string()]))
        .undo();
    assert!(history.can_redo());

    let history = history.commit(snapshot(&["c".to_string()]));
    assert!(!history.can_redo());

    let redone = history.clone().redo();
    assert_eq!(redone, history);
}

#[test]
fn test_apply_edit_commits() {
    let start = HistoryState::new(vec![Node::container("s1", "Section", vec![])]);
    let next = start
        .apply(
            &common::validator(),
            &TreeEdit::Add {
                parent_id: Some("s1".to_string()),
                index: None,
                node: json!({ "id": "t1", "type": "Text" }),
            },
        )
        .unwrap();

    assert!(next.can_undo());
    assert_eq!(next.present()[0].children().unwrap().len(), 1);
    assert_eq!(next.undo().present(), start.present());
}

#[test]
fn test_rejected_edit_leaves_state_untouched() {
    let start = HistoryState::new(vec![Node::new("t1", "Text")]);
    let err = start
        .apply(
            &common::validator(),
            &TreeEdit::Remove {
                id: "missing".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, CmsError::NodeNotFound { .. }));
    assert!(!start.can_undo());
}

#[test]
fn test_set_grid_cols_rejects_out_of_range() {
    let mut history = HistoryState::new(Vec::new());
    assert_eq!(
        history.set_grid_cols(0),
        Err(CmsError::GridColsOutOfRange { value: 0 })
    );
    assert_eq!(history.grid_cols(), GridCols::default());
    history.set_grid_cols(6).unwrap();
    assert_eq!(history.grid_cols().get(), 6);
}

#[test]
fn test_serialized_shape() {
    let history = HistoryState::new(vec![Node::new("a", "Text")]).commit(Vec::new());
    let value = serde_json::to_value(&history).unwrap();
    assert_eq!(
        value,
        json!({
            "past": [[{ "id": "a", "type": "Text" }]],
            "present": [],
            "future": [],
            "gridCols": 12
        })
    );
}

#[test]
fn test_restore_keeps_valid_stored_state() {
    let stored = json!({
        "past": [],
        "present": [{ "id": "x", "type": "Text" }],
        "future": [],
        "gridCols": 4
    });
    let restored = HistoryState::restore(Some(&stored), Vec::new(), &common::validator());
    assert_eq!(restored.present()[0].id(), "x");
    assert_eq!(restored.grid_cols().get(), 4);
}

#[test]
fn test_restore_rejects_out_of_range_grid_cols() {
    let stored = json!({ "past": [], "present": [], "future": [], "gridCols": 99 });
    let initial = vec![Node::new("i", "Text")];
    let restored = HistoryState::restore(Some(&stored), initial.clone(), &common::validator());
    assert_eq!(restored.present(), initial.as_slice());
    assert_eq!(restored.grid_cols().get(), 12);
}

fn arb_snapshot() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec("[a-z]{1,4}", 0..5).prop_map(|ids| snapshot(&ids))
}

proptest! {
    #[test]
    fn prop_undo_inverts_commit(s in arb_snapshot(), s2 in arb_snapshot()) {
        let start = HistoryState::new(s);
        let undone = start.clone().commit(s2.clone()).undo();
        prop_assert_eq!(undone.present(), start.present());
        prop_assert!(undone.past().is_empty());

        let redone = undone.redo();
        prop_assert_eq!(redone.present(), s2.as_slice());
    }

    #[test]
    fn prop_grid_cols_range(value in -100i64..100) {
        let parsed = GridCols::new(value);
        prop_assert_eq!(parsed.is_ok(), (1..=24).contains(&value));
    }
}
