//! Built-in storefront kinds

use serde_json::json;

use super::{make_container, make_kind, one_of, AttrSpec, AttrType, CatalogBuilder, KindSpec};
use crate::errors::Result;

fn opt(name: &str, ty: AttrType) -> AttrSpec {
    AttrSpec::optional(name, ty)
}

fn leaf_kinds() -> Vec<KindSpec> {
    vec![
        make_kind("Text", vec![opt("text", AttrType::Any)]),
        make_kind(
            "Image",
            vec![
                opt("src", AttrType::String),
                opt("alt", AttrType::String),
                opt("cropAspect", AttrType::String),
                opt("focalPoint", AttrType::Object),
            ],
        ),
        make_kind(
            "Button",
            vec![
                opt("label", AttrType::Any),
                opt("variant", AttrType::String),
                opt("size", one_of(&["sm", "md", "lg"])),
            ],
        ),
        make_kind(
            "CustomHtml",
            vec![opt("html", AttrType::String), opt("sanitize", AttrType::Boolean)],
        ),
        make_kind(
            "Header",
            vec![opt("nav", AttrType::Array), opt("logo", AttrType::String)],
        ),
        make_kind(
            "Footer",
            vec![opt("links", AttrType::Array), opt("logo", AttrType::String)],
        ),
        make_kind(
            "AnnouncementBar",
            vec![
                opt("text", AttrType::String),
                opt("link", AttrType::String),
                opt("closable", AttrType::Boolean),
            ],
        ),
        make_kind("CollectionList", vec![opt("collections", AttrType::Array)]),
        make_kind(
            "ProductGrid",
            vec![
                opt("skus", AttrType::Array),
                opt("collectionId", AttrType::String),
                opt("mode", one_of(&["collection", "manual"])),
                opt("quickView", AttrType::Boolean),
            ],
        ),
        make_kind("HeroBanner", vec![opt("slides", AttrType::Array)]),
        make_kind(
            "VideoBlock",
            vec![opt("src", AttrType::String), opt("autoplay", AttrType::Boolean)],
        ),
    ]
}

fn container_kinds() -> Vec<KindSpec> {
    vec![
        make_container(
            "Section",
            vec![
                opt("backgroundColor", AttrType::String),
                opt("contentWidth", AttrType::StringOrNumber),
            ],
        ),
        make_container("Canvas", vec![]),
        make_container(
            "MultiColumn",
            vec![
                opt("columns", AttrType::Integer),
                opt("gap", AttrType::StringOrNumber),
            ],
        ),
        make_container(
            "StackFlex",
            vec![
                opt("direction", one_of(&["row", "column"])),
                opt("gap", AttrType::StringOrNumber),
                opt("wrap", AttrType::Boolean),
            ],
        ),
        make_container(
            "Grid",
            vec![
                opt("columns", AttrType::Integer),
                opt("rows", AttrType::Integer),
                opt("gap", AttrType::StringOrNumber),
            ],
        ),
        make_container(
            "CarouselContainer",
            vec![
                opt("slidesPerView", AttrType::Number),
                opt("showArrows", AttrType::Boolean),
                opt("showDots", AttrType::Boolean),
            ],
        ),
        make_container(
            "Tabs",
            vec![
                opt("labels", AttrType::Array).with_default(json!([])),
                opt("active", AttrType::Integer),
            ],
        ),
        make_container(
            "TabsAccordionContainer",
            vec![
                opt("mode", one_of(&["tabs", "accordion"])),
                opt("tabs", AttrType::Array),
            ],
        ),
        make_container(
            "Dataset",
            vec![
                AttrSpec::required("source", AttrType::String),
                opt("collection", AttrType::String),
                opt("limit", AttrType::Integer),
            ],
        ),
        make_container(
            "Repeater",
            vec![opt("columns", AttrType::Integer), opt("gap", AttrType::StringOrNumber)],
        ),
        make_container(
            "Bind",
            vec![
                AttrSpec::required("prop", AttrType::String),
                opt("path", AttrType::String),
                opt("fallback", AttrType::Any),
            ],
        ),
    ]
}

/// Register every built-in kind (phase 1 only)
///
/// # Errors
///
/// [`CmsError::DuplicateKind`](crate::CmsError::DuplicateKind) if a built-in
/// tag is already present in `builder`.
pub fn register_builtin_kinds(builder: &mut CatalogBuilder) -> Result<()> {
    for spec in leaf_kinds().into_iter().chain(container_kinds()) {
        builder.register(spec)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds_register_cleanly() {
        let mut builder = CatalogBuilder::new();
        register_builtin_kinds(&mut builder).unwrap();
        let catalog = builder.build();
        assert_eq!(catalog.len(), 22);
        for tag in ["Section", "MultiColumn", "Tabs", "Grid", "Repeater", "Dataset", "Bind"] {
            assert!(catalog.is_container(tag), "{tag} should be a container");
        }
        for tag in ["Text", "Image", "Button"] {
            assert!(!catalog.is_container(tag), "{tag} should be a leaf");
        }
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut builder = CatalogBuilder::new();
        register_builtin_kinds(&mut builder).unwrap();
        assert!(register_builtin_kinds(&mut builder).is_err());
    }
}
