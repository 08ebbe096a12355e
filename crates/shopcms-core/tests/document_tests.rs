#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{at, MemoryPages};
use serde_json::json;
use shopcms_core::clock::fixed_clock;
use shopcms_core::document::{publish, revert_to_published, revision_id, unpublish, update_page};
use shopcms_core::{CmsError, HistoryState, Node, Page, PageService, PageStatus, PageUpdate};

fn draft_with(components: Vec<Node>) -> Page {
    let mut page = Page::new("home", "/", "alice", at("2026-01-01T00:00:00Z"));
    page.components = components;
    page
}

#[test]
fn test_publish_freezes_validated_tree() {
    let validator = common::validator();
    let page = draft_with(vec![Node::new("tabs", "Tabs")]);

    let mut published = publish(page, &validator, "bob", at("2026-01-02T00:00:00Z")).unwrap();

    assert_eq!(published.status(), PageStatus::Published);
    assert_eq!(published.published_by(), Some("bob"));
    assert_eq!(published.published_at(), Some(at("2026-01-02T00:00:00Z")));
    let frozen = published.last_published_components().unwrap().to_vec();
    // the validated tree, defaults included
    assert_eq!(frozen[0].attribute("labels"), Some(&json!([])));
    assert_eq!(
        published.published_revision_id(),
        Some(revision_id(&frozen).unwrap().as_str())
    );

    published.components[0].set_attribute("labels", json!(["edited"]));
    published.components.push(Node::new("t1", "Text"));
    assert_eq!(published.last_published_components().unwrap(), frozen.as_slice());
}

#[test]
fn test_publish_rejects_invalid_tree() {
    let validator = common::validator();
    let page = draft_with(vec![Node::new("x", "Bogus")]);
    let err = publish(page, &validator, "bob", at("2026-01-02T00:00:00Z")).unwrap_err();
    assert!(matches!(err, CmsError::Validation { .. }));
}

#[test]
fn test_draft_save_keeps_publish_snapshot() {
    let validator = common::validator();
    let page = draft_with(vec![Node::new("t1", "Text")]);
    let published = publish(page, &validator, "bob", at("2026-01-02T00:00:00Z")).unwrap();
    let snapshot = published.last_published_components().unwrap().to_vec();

    let update = PageUpdate::new(published.updated_at())
        .components(vec![Node::new("t2", "Text")])
        .slug("/home");
    let saved = update_page(published, update, &validator, at("2026-01-03T00:00:00Z")).unwrap();

    assert_eq!(saved.slug, "/home");
    assert_eq!(saved.components[0].id(), "t2");
    assert_eq!(saved.last_published_components().unwrap(), snapshot.as_slice());
    assert_eq!(saved.updated_at(), at("2026-01-03T00:00:00Z"));
}

#[test]
fn test_stale_update_is_a_conflict() {
    let validator = common::validator();
    let page = draft_with(Vec::new());
    let update = PageUpdate::new(at("2025-12-31T00:00:00Z")).slug("/x");

    let err = update_page(page, update, &validator, at("2026-01-03T00:00:00Z")).unwrap_err();
    match err {
        CmsError::StalePublish { page_id, .. } => assert_eq!(page_id, "home"),
        other => panic!("expected StalePublish, got {other:?}"),
    }
}

#[test]
fn test_revert_to_published() {
    let validator = common::validator();
    let never = draft_with(vec![Node::new("t1", "Text")]);
    assert_eq!(
        revert_to_published(never.clone(), at("2026-01-02T00:00:00Z")),
        Err(CmsError::NothingPublished {
            page_id: "home".to_string()
        })
    );

    let published = publish(never, &validator, "bob", at("2026-01-02T00:00:00Z")).unwrap();
    let mut edited = published.clone();
    edited.components.clear();
    let reverted = revert_to_published(edited, at("2026-01-03T00:00:00Z")).unwrap();
    assert_eq!(reverted.components, published.components);

    let draft = unpublish(reverted, at("2026-01-04T00:00:00Z"));
    assert_eq!(draft.status(), PageStatus::Draft);
    assert!(draft.last_published_components().is_some());
}

#[test]
fn test_page_round_trips_through_json() {
    let validator = common::validator();
    let page = draft_with(vec![Node::container("s1", "Section", vec![])]);
    let published = publish(page, &validator, "bob", at("2026-01-02T00:00:00Z")).unwrap();

    let value = serde_json::to_value(&published).unwrap();
    assert_eq!(value["status"], json!("published"));
    assert!(value["lastPublishedComponents"].is_array());
    assert!(value["publishedRevisionId"].is_string());

    let back: Page = serde_json::from_value(value).unwrap();
    assert_eq!(back, published);
}

#[test]
fn test_service_flow() {
    let service = PageService::new(MemoryPages::default(), common::validator())
        .with_clock(fixed_clock(at("2026-02-01T00:00:00Z")));

    let created = service.create("acme", "home", "/", "alice").unwrap();
    assert!(service.create("acme", "home", "/", "alice").is_err());

    let update = PageUpdate::new(created.updated_at())
        .components(vec![Node::new("t1", "Text").with_attribute("text", "hi")]);
    service.update("acme", "home", update).unwrap();

    let published = service.publish("acme", "home", "bob").unwrap();
    assert!(published.is_published());
    assert_eq!(service.get("acme", "home").unwrap(), published);

    assert!(matches!(
        service.get("acme", "about"),
        Err(CmsError::PageNotFound { .. })
    ));
    assert_eq!(service.list("acme").unwrap().len(), 1);
    assert!(service.list("other").unwrap().is_empty());
}

#[test]
fn test_service_delete() {
    let service = PageService::new(MemoryPages::default(), common::validator())
        .with_clock(fixed_clock(at("2026-02-01T00:00:00Z")));
    service.create("acme", "home", "/", "alice").unwrap();
    service.create("acme", "about", "/about", "alice").unwrap();

    service.delete("acme", "home").unwrap();

    assert!(matches!(
        service.get("acme", "home"),
        Err(CmsError::PageNotFound { .. })
    ));
    assert_eq!(service.list("acme").unwrap().len(), 1);
    assert!(matches!(
        service.delete("acme", "home"),
        Err(CmsError::PageNotFound { .. })
    ));
}

#[test]
fn test_draft_save_rejects_history_with_unknown_kind() {
    let validator = common::validator();
    let page = draft_with(Vec::new());
    let history = HistoryState::new(Vec::new()).commit(vec![Node::new("b", "Bogus")]);

    let err = update_page(
        page.clone(),
        PageUpdate::new(page.updated_at()).history(history),
        &validator,
        at("2026-01-02T00:00:00Z"),
    )
    .unwrap_err();
    assert!(matches!(err, CmsError::Validation { .. }));
}

#[test]
fn test_draft_save_normalizes_history() {
    let validator = common::validator();
    let page = draft_with(Vec::new());
    let history = HistoryState::new(vec![Node::new("s1", "Section")]);

    let saved = update_page(
        page.clone(),
        PageUpdate::new(page.updated_at()).history(history),
        &validator,
        at("2026-01-02T00:00:00Z"),
    )
    .unwrap();
    let stored = saved.history.unwrap();
    assert_eq!(stored.present()[0].children(), Some(&[][..]));
}
