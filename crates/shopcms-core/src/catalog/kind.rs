//! Kind descriptors: attribute schemas and the builders that compose them

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{CmsError, Result};
use crate::tree::{ChildrenSlot, Node};

/// Value shape accepted by an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttrType {
    String,
    Number,
    Integer,
    Boolean,
    Enum(Vec<String>),
    /// CSS-ish lengths such as `12` or `"12px"`
    StringOrNumber,
    Array,
    Object,
    Any,
}

impl AttrType {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            AttrType::String => value.is_string(),
            AttrType::Number => value.is_number(),
            AttrType::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
            }
            AttrType::Boolean => value.is_boolean(),
            AttrType::Enum(values) => value
                .as_str()
                .map(|s| values.iter().any(|v| v == s))
                .unwrap_or(false),
            AttrType::StringOrNumber => value.is_string() || value.is_number(),
            AttrType::Array => value.is_array(),
            AttrType::Object => value.is_object(),
            AttrType::Any => true,
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrType::String => f.write_str("a string"),
            AttrType::Number => f.write_str("a number"),
            AttrType::Integer => f.write_str("an integer"),
            AttrType::Boolean => f.write_str("a boolean"),
            AttrType::Enum(values) => write!(f, "one of [{}]", values.join(", ")),
            AttrType::StringOrNumber => f.write_str("a string or number"),
            AttrType::Array => f.write_str("an array"),
            AttrType::Object => f.write_str("an object"),
            AttrType::Any => f.write_str("any value"),
        }
    }
}

/// Shorthand for an [`AttrType::Enum`] over string literals
pub fn one_of(values: &[&str]) -> AttrType {
    AttrType::Enum(values.iter().map(|v| v.to_string()).collect())
}

/// One named attribute of a kind
#[derive(Debug, Clone, PartialEq)]
pub struct AttrSpec {
    pub name: String,
    pub ty: AttrType,
    pub required: bool,
    /// Materialized during validation when the attribute is absent
    pub default: Option<Value>,
}

impl AttrSpec {
    pub fn optional(name: impl Into<String>, ty: AttrType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            default: None,
        }
    }

    pub fn required(name: impl Into<String>, ty: AttrType) -> Self {
        Self {
            required: true,
            ..Self::optional(name, ty)
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Attribute set of a kind, keyed by attribute name
///
/// Unknown attributes are never rejected by a schema; it only describes the
/// ones it knows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSchema {
    fields: BTreeMap<String, AttrSpec>,
}

impl AttributeSchema {
    pub fn new(fields: impl IntoIterator<Item = AttrSpec>) -> Self {
        let mut schema = Self::default();
        schema.extend(fields);
        schema
    }

    /// Add fields; a later field with the same name replaces the earlier one
    pub fn extend(&mut self, fields: impl IntoIterator<Item = AttrSpec>) {
        for field in fields {
            self.fields.insert(field.name.clone(), field);
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrSpec> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &AttrSpec> {
        self.fields.values()
    }

    pub fn required(&self) -> impl Iterator<Item = &AttrSpec> {
        self.fields.values().filter(|f| f.required)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A registered node kind
#[derive(Debug)]
pub struct KindSpec {
    tag: String,
    schema: AttributeSchema,
    children: Option<ChildrenSlot>,
}

impl KindSpec {
    pub fn new(tag: impl Into<String>, schema: AttributeSchema, is_container: bool) -> Self {
        Self {
            tag: tag.into(),
            schema,
            children: is_container.then(ChildrenSlot::new),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Deferred children validator; `None` for leaf kinds
    pub fn children_slot(&self) -> Option<&ChildrenSlot> {
        self.children.as_ref()
    }

    /// Validate a list of children through this kind's slot
    ///
    /// # Errors
    ///
    /// [`CmsError::ValidatorUnbound`] before the catalog is bound,
    /// [`CmsError::InvalidInput`] for leaf kinds, otherwise the same
    /// errors as a full tree validation.
    pub fn validate_children(&self, children: &[Value]) -> Result<Vec<Node>> {
        let slot = self.children.as_ref().ok_or_else(|| CmsError::InvalidInput {
            reason: format!("{} is a leaf kind and cannot have children", self.tag),
        })?;
        slot.resolve()?.validate_list(children)
    }
}

/// Attributes every kind accepts (layout, spacing, interaction, motion)
pub fn base_attributes() -> Vec<AttrSpec> {
    let mut fields = vec![
        AttrSpec::optional("name", AttrType::String),
        AttrSpec::optional("hidden", AttrType::Boolean),
        AttrSpec::optional("locked", AttrType::Boolean),
        AttrSpec::optional("minItems", AttrType::Integer),
        AttrSpec::optional("maxItems", AttrType::Integer),
        AttrSpec::optional("desktopItems", AttrType::Integer),
        AttrSpec::optional("tabletItems", AttrType::Integer),
        AttrSpec::optional("mobileItems", AttrType::Integer),
        AttrSpec::optional(
            "clickAction",
            one_of(&["none", "navigate", "open-modal", "scroll-to"]),
        ),
        AttrSpec::optional("href", AttrType::String),
        AttrSpec::optional("modalHtml", AttrType::String),
        AttrSpec::optional(
            "animation",
            one_of(&[
                "none",
                "fade",
                "slide",
                "slide-up",
                "slide-down",
                "slide-left",
                "slide-right",
                "zoom",
                "rotate",
            ]),
        ),
        AttrSpec::optional("animationDuration", AttrType::Number),
        AttrSpec::optional("animationDelay", AttrType::Number),
        AttrSpec::optional("animationEasing", AttrType::String),
        AttrSpec::optional(
            "reveal",
            one_of(&[
                "fade",
                "slide-up",
                "slide-down",
                "slide-left",
                "slide-right",
                "zoom",
                "rotate",
            ]),
        ),
        AttrSpec::optional("parallax", AttrType::Number),
        AttrSpec::optional("sticky", one_of(&["top", "bottom"])),
        AttrSpec::optional("stickyOffset", AttrType::StringOrNumber),
        AttrSpec::optional("hoverScale", AttrType::Number),
        AttrSpec::optional("hoverOpacity", AttrType::Number),
        AttrSpec::optional("staggerChildren", AttrType::Number),
        AttrSpec::optional("timeline", AttrType::Object),
        AttrSpec::optional(
            "position",
            one_of(&["relative", "absolute", "static", "fixed", "sticky"]),
        ),
        AttrSpec::optional("top", AttrType::StringOrNumber),
        AttrSpec::optional("left", AttrType::StringOrNumber),
    ];
    for prop in ["width", "height", "margin", "padding"] {
        fields.push(AttrSpec::optional(prop, AttrType::StringOrNumber));
        for device in ["Desktop", "Tablet", "Mobile"] {
            fields.push(AttrSpec::optional(
                format!("{}{}", prop, device),
                AttrType::StringOrNumber,
            ));
        }
    }
    fields
}

fn compose(extra: Vec<AttrSpec>) -> AttributeSchema {
    let mut schema = AttributeSchema::new(base_attributes());
    schema.extend(extra);
    schema
}

/// Leaf kind: base attributes merged with `extra` (extra wins on clashes)
pub fn make_kind(tag: impl Into<String>, extra: Vec<AttrSpec>) -> KindSpec {
    KindSpec::new(tag, compose(extra), false)
}

/// Container kind: like [`make_kind`], with an unbound children slot
pub fn make_container(tag: impl Into<String>, extra: Vec<AttrSpec>) -> KindSpec {
    KindSpec::new(tag, compose(extra), true)
}
