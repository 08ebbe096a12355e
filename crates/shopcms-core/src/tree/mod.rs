//! Content tree: nodes, validation, component rules and structural edits

mod deferred;
pub mod edit;
mod node;
mod path;
pub mod rules;
mod validator;

pub use deferred::ChildrenSlot;
pub use edit::{apply_edit, TreeEdit};
pub use node::{walk_all, Node};
pub use path::NodePath;
pub use validator::TreeValidator;
