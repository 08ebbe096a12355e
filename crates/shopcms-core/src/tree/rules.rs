//! Creation-time component rules
//!
//! Advisory checks run over an already validated component list. They never
//! block a save; the editor shows them next to the offending attribute.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::{walk_all, Node, NodePath};
use crate::catalog::Catalog;

/// Deepest allowed nesting below a root component
pub const MAX_NESTING_DEPTH: usize = 8;

const SIZE_KEYS: [&str; 16] = [
    "width",
    "widthDesktop",
    "widthTablet",
    "widthMobile",
    "height",
    "heightDesktop",
    "heightTablet",
    "heightMobile",
    "margin",
    "marginDesktop",
    "marginTablet",
    "marginMobile",
    "padding",
    "paddingDesktop",
    "paddingTablet",
    "paddingMobile",
];

const DEVICE_ITEM_KEYS: [&str; 3] = ["desktopItems", "tabletItems", "mobileItems"];

/// One advisory finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleViolation {
    pub path: NodePath,
    /// Attribute the finding is about, if it concerns a single one
    pub attribute: Option<String>,
    pub message: String,
}

impl RuleViolation {
    fn at(path: &NodePath, attribute: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            attribute: Some(attribute.to_string()),
            message: message.into(),
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attribute) => write!(f, "{}.{}: {}", self.path, attribute, self.message),
            None => write!(f, "{}: {}", self.path, self.message),
        }
    }
}

fn non_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

fn uses_full_viewport(value: &Value) -> bool {
    value.as_str().is_some_and(|s| {
        s.split(|c: char| !c.is_ascii_alphanumeric())
            .any(|token| token == "100vw" || token == "100vh")
    })
}

fn is_aspect_ratio(value: &str) -> bool {
    match value.split_once(':') {
        Some((w, h)) => {
            !w.is_empty()
                && !h.is_empty()
                && w.bytes().all(|b| b.is_ascii_digit())
                && h.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Check every rule over a page's component list
pub fn check_components(catalog: &Catalog, components: &[Node]) -> Vec<RuleViolation> {
    let mut violations = Vec::new();

    for (i, root) in components.iter().enumerate() {
        let root_path = NodePath::root().child(i);

        if root.attribute("position").and_then(Value::as_str) == Some("absolute") {
            violations.push(RuleViolation::at(
                &root_path,
                "position",
                format!(
                    "root component '{}' should not use absolute positioning",
                    root.kind()
                ),
            ));
        }

        // viewport units: only the first hit per root is reported
        let mut flagged = false;
        root.walk(&root_path, &mut |node, path| {
            if flagged {
                return;
            }
            if let Some(key) = SIZE_KEYS
                .iter()
                .find(|key| node.attribute(key).is_some_and(uses_full_viewport))
            {
                flagged = true;
                violations.push(RuleViolation::at(
                    path,
                    key,
                    format!("'{}' uses 100vw/100vh", key),
                ));
            }
        });

        let mut depth_exceeded = false;
        root.walk(&root_path, &mut |_, path| {
            if path.depth() - 1 > MAX_NESTING_DEPTH {
                depth_exceeded = true;
            }
        });
        if depth_exceeded {
            violations.push(RuleViolation {
                path: root_path.clone(),
                attribute: None,
                message: format!("nesting depth exceeds {} levels", MAX_NESTING_DEPTH),
            });
        }
    }

    walk_all(components, &mut |node, path| {
        check_node(catalog, node, path, &mut violations)
    });
    violations
}

fn check_node(catalog: &Catalog, node: &Node, path: &NodePath, out: &mut Vec<RuleViolation>) {
    if node.kind() == "Image" {
        match node.attribute("cropAspect").and_then(Value::as_str) {
            Some(aspect) if is_aspect_ratio(aspect.trim()) => {}
            Some(aspect) if !aspect.trim().is_empty() => out.push(RuleViolation::at(
                path,
                "cropAspect",
                "cropAspect should be in W:H format like 16:9",
            )),
            _ => out.push(RuleViolation::at(
                path,
                "cropAspect",
                "Image should specify cropAspect",
            )),
        }
        if !non_blank(node.attribute("alt")) {
            out.push(RuleViolation::at(path, "alt", "Image should include alt text"));
        }
    }

    if non_blank(node.attribute("sticky")) && !non_blank(node.attribute("stickyOffset")) {
        out.push(RuleViolation::at(
            path,
            "stickyOffset",
            "sticky requires stickyOffset",
        ));
    }

    match node.attribute("clickAction").and_then(Value::as_str) {
        Some("navigate") if !non_blank(node.attribute("href")) => out.push(RuleViolation::at(
            path,
            "href",
            "clickAction 'navigate' requires href",
        )),
        Some("open-modal") if !non_blank(node.attribute("modalHtml")) => {
            out.push(RuleViolation::at(
                path,
                "modalHtml",
                "clickAction 'open-modal' requires modalHtml",
            ))
        }
        _ => {}
    }

    let number = |key: &str| node.attribute(key).and_then(Value::as_f64);
    let (min, max) = (number("minItems"), number("maxItems"));
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            out.push(RuleViolation::at(
                path,
                "minItems",
                "minItems cannot be greater than maxItems",
            ));
        }
    }
    for key in DEVICE_ITEM_KEYS {
        let Some(value) = number(key) else { continue };
        if min.is_some_and(|min| value < min) {
            out.push(RuleViolation::at(path, key, format!("{} must be >= minItems", key)));
        }
        if max.is_some_and(|max| value > max) {
            out.push(RuleViolation::at(path, key, format!("{} must be <= maxItems", key)));
        }
    }

    let animated = node
        .attribute("animation")
        .and_then(Value::as_str)
        .is_some_and(|a| !a.is_empty() && a != "none");
    if animated && !number("animationDuration").is_some_and(|d| d > 0.0) {
        out.push(RuleViolation::at(
            path,
            "animationDuration",
            "animation requires a positive animationDuration",
        ));
    }

    if let Some(parallax) = number("parallax") {
        if parallax <= 0.0 || parallax > 1.0 {
            out.push(RuleViolation::at(
                path,
                "parallax",
                "parallax should be > 0 and <= 1",
            ));
        }
    }

    if let Some(key) = ["margin", "marginDesktop", "marginTablet", "marginMobile"]
        .into_iter()
        .find(|key| {
            node.attribute(key)
                .and_then(Value::as_str)
                .is_some_and(|v| v.trim_start().starts_with('-'))
        })
    {
        out.push(RuleViolation::at(path, key, "negative margins are not allowed"));
    }

    let has_children = node.children().is_some_and(|c| !c.is_empty());
    if has_children && !catalog.is_container(node.kind()) {
        out.push(RuleViolation::at(
            path,
            "children",
            format!("'{}' cannot have children; only containers may", node.kind()),
        ));
    }
}
