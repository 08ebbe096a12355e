//! Recursive tree validator
//!
//! Built in two phases: [`CatalogBuilder`](crate::catalog::CatalogBuilder)
//! registers every kind, then [`TreeValidator::bind`] wires each container's
//! [`ChildrenSlot`](super::ChildrenSlot) to the finished validator. Children
//! are always validated through that slot, so a catalog that was never bound
//! fails with [`CmsError::ValidatorUnbound`] instead of validating with a
//! partial recursion.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::node::RESERVED_KEYS;
use super::{Node, NodePath};
use crate::catalog::{Catalog, KindSpec};
use crate::errors::{CmsError, Result, ValidationError};
use crate::{log_op_end, log_op_error, log_op_start};

/// Shared state behind every handle to a bound validator
#[derive(Debug)]
pub(crate) struct ValidatorCore {
    catalog: Catalog,
}

impl ValidatorCore {
    /// Validate a detached list of children, as a container slot would
    pub(crate) fn validate_list(&self, raws: &[Value]) -> Result<Vec<Node>> {
        let mut walk = Walk::default();
        let mut nodes = Vec::with_capacity(raws.len());
        for (i, raw) in raws.iter().enumerate() {
            if let Some(node) = walk.node(self, raw, NodePath::root().child(i))? {
                nodes.push(node);
            }
        }
        walk.finish(nodes)
    }
}

/// Immutable, fully bound validator over a catalog
///
/// Cheap to clone; every clone shares the same catalog.
#[derive(Debug, Clone)]
pub struct TreeValidator {
    core: Arc<ValidatorCore>,
}

impl TreeValidator {
    /// Phase 2: take ownership of a complete catalog and bind every
    /// container's children slot to the resulting validator
    ///
    /// # Errors
    ///
    /// [`CmsError::ValidatorAlreadyBound`] if a slot was bound before.
    pub fn bind(catalog: Catalog) -> Result<Self> {
        log_op_start!("bind_validator", kind_count = catalog.len());
        let start = Instant::now();

        let core = Arc::new(ValidatorCore { catalog });
        let weak = Arc::downgrade(&core);
        for kind in core.catalog.kinds() {
            if let Some(slot) = kind.children_slot() {
                slot.bind(kind.tag(), weak.clone()).map_err(|e| {
                    log_op_error!(
                        "bind_validator",
                        e.clone(),
                        duration_ms = start.elapsed().as_millis() as u64
                    );
                    e
                })?;
            }
        }

        log_op_end!(
            "bind_validator",
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(Self { core })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.core.catalog
    }

    /// Validate a single raw node and everything below it
    ///
    /// # Errors
    ///
    /// [`CmsError::Validation`] carrying every issue found in the tree, or a
    /// configuration error if a container slot cannot be resolved.
    pub fn validate(&self, raw: &Value) -> Result<Node> {
        let mut walk = Walk::default();
        let node = walk.node(&self.core, raw, NodePath::root())?;
        let mut nodes = walk.finish(node.into_iter().collect())?;
        nodes.pop().ok_or_else(|| CmsError::InvalidInput {
            reason: "tree validation produced no node".to_string(),
        })
    }

    /// Validate a page's component list; paths start at the root index
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate); a value that is not an array
    /// is reported as an invalid child at the root.
    pub fn validate_components(&self, raw: &Value) -> Result<Vec<Node>> {
        match raw.as_array() {
            Some(items) => self.core.validate_list(items),
            None => Err(CmsError::Validation {
                issues: vec![ValidationError::InvalidChild {
                    path: NodePath::root(),
                    reason: "components must be an array".to_string(),
                }],
            }),
        }
    }

    /// Re-validate nodes that are already typed, e.g. before publishing
    ///
    /// # Errors
    ///
    /// Same as [`validate_components`](Self::validate_components).
    pub fn validate_nodes(&self, nodes: &[Node]) -> Result<Vec<Node>> {
        let raw = serde_json::to_value(nodes)?;
        self.validate_components(&raw)
    }
}

/// Accumulated state of one validation pass
#[derive(Default)]
struct Walk {
    issues: Vec<ValidationError>,
    seen: HashMap<String, NodePath>,
}

impl Walk {
    fn finish(self, nodes: Vec<Node>) -> Result<Vec<Node>> {
        if self.issues.is_empty() {
            Ok(nodes)
        } else {
            debug!(issue_count = self.issues.len(), "tree validation failed");
            Err(CmsError::Validation {
                issues: self.issues,
            })
        }
    }

    /// `Ok(None)` means the node had issues, which are recorded; `Err` is
    /// reserved for configuration defects.
    fn node(&mut self, core: &ValidatorCore, raw: &Value, path: NodePath) -> Result<Option<Node>> {
        let Some(object) = raw.as_object() else {
            self.issues.push(ValidationError::InvalidChild {
                path,
                reason: "node must be a JSON object".to_string(),
            });
            return Ok(None);
        };

        let tag = match object.get("type") {
            Some(Value::String(tag)) => tag.as_str(),
            _ => {
                self.issues.push(ValidationError::InvalidAttribute {
                    path,
                    attribute: "type".to_string(),
                    expected: "a kind tag string".to_string(),
                });
                return Ok(None);
            }
        };
        let Some(kind) = core.catalog.lookup(tag) else {
            self.issues.push(ValidationError::UnknownKind {
                path,
                kind: tag.to_string(),
            });
            return Ok(None);
        };

        let before = self.issues.len();
        let id = self.id(object, kind, &path);
        let attributes = self.attributes(object, kind, &path);
        let children = self.children(object, kind, &path)?;

        if self.issues.len() > before {
            return Ok(None);
        }
        match (id, attributes) {
            (Some(id), Some(attributes)) => Ok(Some(Node::from_parts(
                id,
                tag.to_string(),
                attributes,
                children,
            ))),
            _ => Ok(None),
        }
    }

    fn id(&mut self, object: &Map<String, Value>, kind: &KindSpec, path: &NodePath) -> Option<String> {
        let id = match object.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id,
            Some(_) => {
                self.issues.push(ValidationError::InvalidAttribute {
                    path: path.clone(),
                    attribute: "id".to_string(),
                    expected: "a non-empty string".to_string(),
                });
                return None;
            }
            None => {
                self.issues.push(ValidationError::MissingRequiredAttribute {
                    path: path.clone(),
                    kind: kind.tag().to_string(),
                    attribute: "id".to_string(),
                });
                return None;
            }
        };
        if let Some(first) = self.seen.get(id) {
            self.issues.push(ValidationError::DuplicateId {
                path: path.clone(),
                id: id.clone(),
                first: first.clone(),
            });
            return None;
        }
        self.seen.insert(id.clone(), path.clone());
        Some(id.clone())
    }

    /// Check known attributes, keep unknown ones, materialize defaults
    fn attributes(
        &mut self,
        object: &Map<String, Value>,
        kind: &KindSpec,
        path: &NodePath,
    ) -> Option<Map<String, Value>> {
        let mut attributes: Map<String, Value> = object
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut ok = true;
        let mut missing_reported = false;
        for field in kind.schema().fields() {
            match attributes.get(&field.name) {
                Some(value) => {
                    if !field.ty.accepts(value) {
                        self.issues.push(ValidationError::InvalidAttribute {
                            path: path.clone(),
                            attribute: field.name.clone(),
                            expected: field.ty.to_string(),
                        });
                        ok = false;
                    }
                }
                None if field.required => {
                    // one missing required attribute is enough to fail the node
                    if !missing_reported {
                        self.issues.push(ValidationError::MissingRequiredAttribute {
                            path: path.clone(),
                            kind: kind.tag().to_string(),
                            attribute: field.name.clone(),
                        });
                        missing_reported = true;
                    }
                    ok = false;
                }
                None => {
                    if let Some(default) = &field.default {
                        attributes.insert(field.name.clone(), default.clone());
                    }
                }
            }
        }
        ok.then_some(attributes)
    }

    fn children(
        &mut self,
        object: &Map<String, Value>,
        kind: &KindSpec,
        path: &NodePath,
    ) -> Result<Option<Vec<Node>>> {
        let Some(slot) = kind.children_slot() else {
            // even `null` claims a slot a leaf does not have
            if object.contains_key("children") {
                self.issues.push(ValidationError::InvalidChild {
                    path: path.clone(),
                    reason: format!("{} is a leaf kind and cannot have children", kind.tag()),
                });
            }
            return Ok(None);
        };

        let items = match object.get("children").filter(|v| !v.is_null()) {
            None => return Ok(Some(Vec::new())),
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.issues.push(ValidationError::InvalidChild {
                    path: path.clone(),
                    reason: "children must be an array".to_string(),
                });
                return Ok(Some(Vec::new()));
            }
        };

        let children_core = slot.resolve()?;
        let mut children = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if let Some(child) = self.node(&children_core, item, path.child(i))? {
                children.push(child);
            }
        }
        Ok(Some(children))
    }
}
