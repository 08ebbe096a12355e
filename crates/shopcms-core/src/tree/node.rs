use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::NodePath;

/// Keys owned by the node envelope rather than the attribute map
pub(crate) const RESERVED_KEYS: [&str; 3] = ["id", "type", "children"];

/// One component instance in a page tree
///
/// `id` and `type` cannot change once a node exists. Container nodes always
/// carry a (possibly empty) `children` list; leaf nodes never do.
/// Attributes the catalog does not know about are kept as-is so that
/// attributes written by newer editors survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<Node>>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl Node {
    /// Create a leaf node with no attributes
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            children: None,
            attributes: Map::new(),
        }
    }

    /// Create a container node holding `children`
    pub fn container(id: impl Into<String>, kind: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            children: Some(children),
            attributes: Map::new(),
        }
    }

    pub(crate) fn from_parts(
        id: String,
        kind: String,
        attributes: Map<String, Value>,
        children: Option<Vec<Node>>,
    ) -> Self {
        Self {
            id,
            kind,
            children,
            attributes,
        }
    }

    /// Builder-style attribute setter; reserved keys are ignored
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The kind tag, serialized as `type`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Set an attribute. Returns false (and changes nothing) for `id`,
    /// `type` and `children`.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return false;
        }
        self.attributes.insert(key, value.into());
        true
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    pub fn children(&self) -> Option<&[Node]> {
        self.children.as_deref()
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        self.children.as_mut()
    }

    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Number of nodes in this subtree, including `self`
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .map(|c| c.iter().map(Node::subtree_len).sum())
            .unwrap_or(0)
    }

    /// Visit every node of the subtree depth-first, parents before children
    pub fn walk<F>(&self, path: &NodePath, visit: &mut F)
    where
        F: FnMut(&Node, &NodePath),
    {
        visit(self, path);
        if let Some(children) = self.children() {
            for (i, child) in children.iter().enumerate() {
                child.walk(&path.child(i), visit);
            }
        }
    }

    /// Rebuild this subtree with every id replaced by `fresh_id()`
    pub(crate) fn with_fresh_ids<F>(&self, fresh_id: &mut F) -> Node
    where
        F: FnMut() -> String,
    {
        Node {
            id: fresh_id(),
            kind: self.kind.clone(),
            attributes: self.attributes.clone(),
            children: self
                .children
                .as_ref()
                .map(|c| c.iter().map(|n| n.with_fresh_ids(fresh_id)).collect()),
        }
    }
}

/// Visit every node of a component list, paths starting at the root index
pub fn walk_all<F>(nodes: &[Node], visit: &mut F)
where
    F: FnMut(&Node, &NodePath),
{
    for (i, node) in nodes.iter().enumerate() {
        node.walk(&NodePath::root().child(i), visit);
    }
}
