#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use shopcms_core::catalog::{make_container, make_kind, AttrSpec, AttrType};
use shopcms_core::CatalogBuilder;

#[test]
fn test_section_with_text_child_validates() {
    let mut builder = CatalogBuilder::new();
    builder
        .register(make_kind(
            "Text",
            vec![AttrSpec::optional("text", AttrType::String)],
        ))
        .unwrap();
    builder.register(make_container("Section", vec![])).unwrap();
    let validator = builder.bind().unwrap();

    let node = validator
        .validate(&json!({
            "id": "s1",
            "type": "Section",
            "children": [{ "id": "t1", "type": "Text", "text": "hi" }]
        }))
        .unwrap();

    let children = node.children().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id(), "t1");
    assert_eq!(children[0].attribute("text"), Some(&json!("hi")));
}
