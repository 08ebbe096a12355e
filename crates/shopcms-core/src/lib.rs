//! shopcms core - content-tree document model for shop storefronts
//!
//! This crate provides:
//! - The component kind catalog, assembled once at startup
//! - A two-phase recursive tree validator over that catalog
//! - Creation-time component rules and structural tree edits
//! - The page document model (draft ⇄ published) with publish snapshots
//! - Linear undo/redo history over tree snapshots
//! - Settings diffing and the append-only settings audit trail
//!
//! Everything here is synchronous and free of I/O; persistence is reached
//! through the [`audit::SettingsRepository`] and
//! [`document::PageRepository`] traits.

pub mod audit;
pub mod catalog;
pub mod clock;
pub mod document;
pub mod errors;
pub mod history;
pub mod logging_facility;
pub mod tree;

pub use shopcms_core_types::schema;

// Re-export commonly used types
pub use audit::{
    compute_diff, AuditEntry, AuditTrail, SaveOutcome, SettingsDiff, SettingsRepository, ShopSettings,
};
pub use catalog::{build_default_validator, make_container, make_kind, Catalog, CatalogBuilder};
pub use clock::Clock;
pub use document::{Page, PageRepository, PageService, PageStatus, PageUpdate, SeoMeta};
pub use errors::{CmsError, ExError, ExErrorKind, Result, ValidationError};
pub use history::{GridCols, HistoryState};
pub use tree::{Node, NodePath, TreeEdit, TreeValidator};
