//! Linear undo/redo history over component-tree snapshots
//!
//! Transitions consume the state and return the next one. Entries in `past`
//! and `future` are frozen `Arc<[Node]>` snapshots; only `present` can be
//! edited in place.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::errors::{CmsError, Result};
use crate::tree::{apply_edit, Node, TreeEdit, TreeValidator};

/// Editor grid column count, always within `1..=24`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct GridCols(u8);

impl GridCols {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 24;
    pub const DEFAULT: u8 = 12;

    /// # Errors
    ///
    /// [`CmsError::GridColsOutOfRange`] outside `1..=24`; values are never clamped.
    pub fn new(value: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CmsError::GridColsOutOfRange { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for GridCols {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<i64> for GridCols {
    type Error = CmsError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<GridCols> for i64 {
    fn from(cols: GridCols) -> Self {
        i64::from(cols.0)
    }
}

impl fmt::Display for GridCols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Undo/redo state of one page editor
///
/// `future[0]` is the next state `redo` returns to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    past: Vec<Arc<[Node]>>,
    present: Vec<Node>,
    future: Vec<Arc<[Node]>>,
    #[serde(default)]
    grid_cols: GridCols,
    /// Per-node editor flags, carried through untouched
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    editor: Map<String, Value>,
}

impl HistoryState {
    pub fn new(present: Vec<Node>) -> Self {
        Self {
            past: Vec::new(),
            present,
            future: Vec::new(),
            grid_cols: GridCols::default(),
            editor: Map::new(),
        }
    }

    /// Parse a stored history, falling back to a fresh one over `initial`
    /// when nothing is stored or the stored value is invalid
    ///
    /// Every snapshot must pass `validator`; a history holding unknown kinds
    /// or malformed trees is discarded like one that fails to parse.
    pub fn restore(stored: Option<&Value>, initial: Vec<Node>, validator: &TreeValidator) -> Self {
        let Some(stored) = stored else {
            return Self::new(initial);
        };
        let restored = Self::deserialize(stored)
            .map_err(CmsError::from)
            .and_then(|state| state.validated(validator));
        match restored {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "discarding invalid stored history");
                Self::new(initial)
            }
        }
    }

    /// Re-validate every snapshot, normalizing them as validation does
    ///
    /// # Errors
    ///
    /// [`CmsError::Validation`] for the first snapshot that fails.
    pub fn validated(self, validator: &TreeValidator) -> Result<Self> {
        let freeze = |snapshots: Vec<Arc<[Node]>>| -> Result<Vec<Arc<[Node]>>> {
            snapshots
                .iter()
                .map(|s| validator.validate_nodes(s).map(Arc::from))
                .collect()
        };
        Ok(Self {
            past: freeze(self.past)?,
            present: validator.validate_nodes(&self.present)?,
            future: freeze(self.future)?,
            grid_cols: self.grid_cols,
            editor: self.editor,
        })
    }

    pub fn past(&self) -> &[Arc<[Node]>] {
        &self.past
    }

    pub fn present(&self) -> &[Node] {
        &self.present
    }

    /// The live editing buffer
    pub fn present_mut(&mut self) -> &mut Vec<Node> {
        &mut self.present
    }

    pub fn future(&self) -> &[Arc<[Node]>] {
        &self.future
    }

    pub fn grid_cols(&self) -> GridCols {
        self.grid_cols
    }

    pub fn editor(&self) -> &Map<String, Value> {
        &self.editor
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Snapshot the current present and replace it; clears the redo branch
    pub fn commit(mut self, new_present: Vec<Node>) -> Self {
        let previous = std::mem::replace(&mut self.present, new_present);
        self.past.push(Arc::from(previous));
        self.future.clear();
        self
    }

    /// No-op when there is nothing to undo
    pub fn undo(mut self) -> Self {
        let Some(previous) = self.past.pop() else {
            return self;
        };
        let current = std::mem::replace(&mut self.present, previous.to_vec());
        self.future.insert(0, Arc::from(current));
        self
    }

    /// No-op when there is nothing to redo
    pub fn redo(mut self) -> Self {
        if self.future.is_empty() {
            return self;
        }
        let next = self.future.remove(0);
        let current = std::mem::replace(&mut self.present, next.to_vec());
        self.past.push(Arc::from(current));
        self
    }

    /// Apply a tree edit to the present and commit the result as a new state
    ///
    /// Borrows `self` so a rejected edit leaves the caller's state intact.
    ///
    /// # Errors
    ///
    /// Any error of [`apply_edit`].
    pub fn apply(&self, validator: &TreeValidator, edit: &TreeEdit) -> Result<Self> {
        let edited = apply_edit(validator, &self.present, edit)?;
        Ok(self.clone().commit(edited))
    }

    /// # Errors
    ///
    /// [`CmsError::GridColsOutOfRange`] outside `1..=24`.
    pub fn set_grid_cols(&mut self, value: i64) -> Result<()> {
        self.grid_cols = GridCols::new(value)?;
        Ok(())
    }
}
