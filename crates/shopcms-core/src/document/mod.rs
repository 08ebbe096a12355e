//! Page document model
//!
//! `draft ⇄ published`. Publishing re-validates the live components and
//! freezes a copy of them; draft saves never touch that copy.

mod digest;
mod lifecycle;
mod page;
mod repository;
mod service;

pub use digest::revision_id;
pub use lifecycle::{publish, revert_to_published, unpublish, update_page, PageUpdate};
pub use page::{Page, PageStatus, SeoMeta, Translated};
pub use repository::PageRepository;
pub use service::PageService;
