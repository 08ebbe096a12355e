//! shopcms store - file-system persistence for shop settings and pages
//!
//! Provides:
//! - Atomic temp-file + rename writes and line appends
//! - Per-shop directory layout with shop id checks
//! - `SettingsRepository` and `PageRepository` implementations over JSON files
//! - Store configuration from `SHOPCMS_*` environment variables

pub mod atomic;
pub mod config;
pub mod errors;
pub mod layout;
pub mod page_store;
pub mod settings_store;

pub use config::StoreConfig;
pub use errors::Result;
pub use layout::ShopLayout;
pub use page_store::FsPageStore;
pub use settings_store::FsSettingsStore;
