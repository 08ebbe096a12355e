#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use serde_json::json;
use shopcms_core::tree::apply_edit;
use shopcms_core::{CmsError, HistoryState, TreeEdit, ValidationError};

#[test]
fn test_edit_wire_format() {
    let edit: TreeEdit = serde_json::from_value(json!({
        "action": "move",
        "id": "t1",
        "toParent": "s2",
        "index": 0
    }))
    .unwrap();
    assert_eq!(
        edit,
        TreeEdit::Move {
            id: "t1".to_string(),
            to_parent: Some("s2".to_string()),
            index: Some(0),
        }
    );
    assert_eq!(edit.target_id(), Some("t1"));
}

#[test]
fn test_duplicated_tree_still_validates() {
    let validator = common::validator();
    let components = validator
        .validate_components(&json!([{
            "id": "s1",
            "type": "Section",
            "children": [{ "id": "t1", "type": "Text", "text": "hi" }]
        }]))
        .unwrap();

    let edited = apply_edit(&validator, &components, &TreeEdit::Duplicate { id: "t1".to_string() }).unwrap();
    let children = edited[0].children().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[1].attribute("text"), Some(&json!("hi")));

    validator.validate_nodes(&edited).unwrap();
}

#[test]
fn test_add_with_existing_id_is_rejected() {
    let validator = common::validator();
    let components = validator
        .validate_components(&json!([{ "id": "s1", "type": "Section" }]))
        .unwrap();
    let edit: TreeEdit = serde_json::from_value(json!({
        "action": "add",
        "parentId": null,
        "node": { "id": "s1", "type": "Text" }
    }))
    .unwrap();
    assert!(apply_edit(&validator, &components, &edit).is_err());
}

fn add(parent_id: Option<&str>, node: serde_json::Value) -> TreeEdit {
    serde_json::from_value(json!({
        "action": "add",
        "parentId": parent_id,
        "node": node
    }))
    .unwrap()
}

#[test]
fn test_added_container_without_children_can_hold_children() {
    let validator = common::validator();
    let history = HistoryState::new(Vec::new())
        .apply(&validator, &add(None, json!({ "id": "s1", "type": "Section" })))
        .unwrap();
    assert_eq!(history.present()[0].children(), Some(&[][..]));

    let history = history
        .apply(
            &validator,
            &add(Some("s1"), json!({ "id": "t1", "type": "Text" })),
        )
        .unwrap();
    assert_eq!(history.present()[0].children().unwrap()[0].id(), "t1");
}

#[test]
fn test_added_unknown_kind_never_reaches_history() {
    let validator = common::validator();
    let start = HistoryState::new(Vec::new());
    let err = start
        .apply(&validator, &add(None, json!({ "id": "x", "type": "Bogus" })))
        .unwrap_err();

    assert!(matches!(err.issues(), [ValidationError::UnknownKind { .. }]));
    assert!(!start.can_undo());
    assert!(start.present().is_empty());
}

#[test]
fn test_added_node_with_leaf_children_is_rejected() {
    let validator = common::validator();
    let err = apply_edit(
        &validator,
        &[],
        &add(None, json!({ "id": "t1", "type": "Text", "children": [] })),
    )
    .unwrap_err();
    assert!(matches!(err, CmsError::Validation { .. }));
}
