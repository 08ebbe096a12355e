//! Late-bound reference from a container kind to the full tree validator
//!
//! A container's children may be any node, including other containers, so
//! the container cannot point at the finished validator while kinds are
//! still being registered. Each container kind instead owns a
//! [`ChildrenSlot`] that is bound exactly once, when the complete catalog
//! is turned into a [`TreeValidator`](super::TreeValidator).

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use super::validator::ValidatorCore;
use crate::errors::{CmsError, Result};

/// Deferred cell resolved to the bound validator
///
/// The slot holds a weak reference: the validator owns the catalog, which
/// owns the slots, so a strong reference would never be freed.
#[derive(Clone, Default)]
pub struct ChildrenSlot {
    cell: Arc<OnceLock<Weak<ValidatorCore>>>,
}

impl ChildrenSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.cell.get().is_some()
    }

    pub(crate) fn bind(&self, kind: &str, core: Weak<ValidatorCore>) -> Result<()> {
        self.cell
            .set(core)
            .map_err(|_| CmsError::ValidatorAlreadyBound {
                kind: kind.to_string(),
            })
    }

    /// Resolve to the bound validator; unbound or dropped is a configuration defect
    pub(crate) fn resolve(&self) -> Result<Arc<ValidatorCore>> {
        self.cell
            .get()
            .and_then(Weak::upgrade)
            .ok_or(CmsError::ValidatorUnbound)
    }
}

impl fmt::Debug for ChildrenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildrenSlot")
            .field("bound", &self.is_bound())
            .finish()
    }
}
