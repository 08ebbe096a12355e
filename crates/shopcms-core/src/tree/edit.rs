//! Structural edits over a component list
//!
//! Every edit produces a new list; the input is never modified, so the
//! caller can commit the result to history as a fresh snapshot. Edits go
//! through the [`TreeValidator`]: an added node arrives as raw JSON and is
//! validated before insertion, and the edited list is validated as a whole.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::node::RESERVED_KEYS;
use super::{walk_all, Node, NodePath, TreeValidator};
use crate::errors::{CmsError, Result};

/// An editor action on the component tree
///
/// `parent_id: None` addresses the root list. A missing `index` appends;
/// an index past the end is clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum TreeEdit {
    /// `node` is untrusted editor input until validated
    #[serde(rename_all = "camelCase")]
    Add {
        parent_id: Option<String>,
        index: Option<usize>,
        node: Value,
    },
    Remove {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    Move {
        id: String,
        to_parent: Option<String>,
        index: Option<usize>,
    },
    /// Shallow attribute merge; a `null` value removes the attribute
    Update {
        id: String,
        attributes: Map<String, Value>,
    },
    /// Copy a subtree with fresh ids, inserted right after the original
    Duplicate {
        id: String,
    },
}

impl TreeEdit {
    /// Id of the node the edit is about; `None` for an added node without one
    pub fn target_id(&self) -> Option<&str> {
        match self {
            TreeEdit::Add { node, .. } => node.get("id").and_then(Value::as_str),
            TreeEdit::Remove { id }
            | TreeEdit::Move { id, .. }
            | TreeEdit::Update { id, .. }
            | TreeEdit::Duplicate { id } => Some(id),
        }
    }
}

/// Apply one edit, returning the edited and re-validated copy of `nodes`
///
/// # Errors
///
/// [`CmsError::Validation`] if the added node or the edited list does not
/// validate; [`CmsError::NodeNotFound`] for unknown ids;
/// [`CmsError::InvalidInput`] for adding under a leaf, moving a node into
/// its own subtree, reusing an existing id, or updating a reserved key.
pub fn apply_edit(validator: &TreeValidator, nodes: &[Node], edit: &TreeEdit) -> Result<Vec<Node>> {
    let mut tree = nodes.to_vec();
    match edit {
        TreeEdit::Add {
            parent_id,
            index,
            node,
        } => {
            let node = validator.validate(node)?;
            let mut clash = None;
            node.walk(&NodePath::root(), &mut |n, _| {
                if clash.is_none() && contains_id(nodes, n.id()) {
                    clash = Some(n.id().to_string());
                }
            });
            if let Some(id) = clash {
                return Err(CmsError::InvalidInput {
                    reason: format!("node id '{}' is already in use", id),
                });
            }
            insert(&mut tree, parent_id.as_deref(), *index, node)?;
        }
        TreeEdit::Remove { id } => {
            take(&mut tree, id).ok_or_else(|| not_found(id))?;
        }
        TreeEdit::Move {
            id,
            to_parent,
            index,
        } => {
            let moving = find(nodes, id).ok_or_else(|| not_found(id))?;
            if let Some(parent) = to_parent {
                if contains_id(std::slice::from_ref(moving), parent) {
                    return Err(CmsError::InvalidInput {
                        reason: format!("cannot move '{}' into its own subtree", id),
                    });
                }
            }
            let node = take(&mut tree, id).ok_or_else(|| not_found(id))?;
            insert(&mut tree, to_parent.as_deref(), *index, node)?;
        }
        TreeEdit::Update { id, attributes } => {
            if let Some(key) = attributes
                .keys()
                .find(|k| RESERVED_KEYS.contains(&k.as_str()))
            {
                return Err(CmsError::InvalidInput {
                    reason: format!("'{}' cannot be changed by an update", key),
                });
            }
            let node = find_mut(&mut tree, id).ok_or_else(|| not_found(id))?;
            for (key, value) in attributes {
                if value.is_null() {
                    node.remove_attribute(key);
                } else {
                    node.set_attribute(key.clone(), value.clone());
                }
            }
        }
        TreeEdit::Duplicate { id } => {
            let mut fresh_id = || Uuid::new_v4().to_string();
            if !duplicate_in(&mut tree, id, &mut fresh_id) {
                return Err(not_found(id));
            }
        }
    }
    validator.validate_nodes(&tree)
}

fn not_found(id: &str) -> CmsError {
    CmsError::NodeNotFound {
        node_id: id.to_string(),
    }
}

fn contains_id(nodes: &[Node], id: &str) -> bool {
    let mut found = false;
    walk_all(nodes, &mut |n, _| found |= n.id() == id);
    found
}

fn find<'a>(list: &'a [Node], id: &str) -> Option<&'a Node> {
    list.iter().find_map(|node| {
        if node.id() == id {
            Some(node)
        } else {
            node.children().and_then(|c| find(c, id))
        }
    })
}

fn find_mut<'a>(list: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in list.iter_mut() {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = node.children_mut().and_then(|c| find_mut(c, id)) {
            return Some(found);
        }
    }
    None
}

fn take(list: &mut Vec<Node>, id: &str) -> Option<Node> {
    if let Some(i) = list.iter().position(|n| n.id() == id) {
        return Some(list.remove(i));
    }
    list.iter_mut()
        .find_map(|n| n.children_mut().and_then(|c| take(c, id)))
}

fn insert(tree: &mut Vec<Node>, parent_id: Option<&str>, index: Option<usize>, node: Node) -> Result<()> {
    let list = match parent_id {
        None => tree,
        Some(pid) => {
            let parent = find_mut(tree, pid).ok_or_else(|| not_found(pid))?;
            let reason = format!("{} '{}' is a leaf and cannot hold children", parent.kind(), pid);
            parent
                .children_mut()
                .ok_or(CmsError::InvalidInput { reason })?
        }
    };
    let at = index.map_or(list.len(), |i| i.min(list.len()));
    list.insert(at, node);
    Ok(())
}

fn duplicate_in<F>(list: &mut Vec<Node>, id: &str, fresh_id: &mut F) -> bool
where
    F: FnMut() -> String,
{
    if let Some(i) = list.iter().position(|n| n.id() == id) {
        let copy = list[i].with_fresh_ids(fresh_id);
        list.insert(i + 1, copy);
        return true;
    }
    list.iter_mut().any(|n| {
        n.children_mut()
            .is_some_and(|c| duplicate_in(c, id, fresh_id))
    })
}
