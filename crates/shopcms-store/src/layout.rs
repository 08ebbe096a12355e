//! Per-shop file layout under the data root
//!
//! ```text
//! <root>/<shop_id>/settings.json
//! <root>/<shop_id>/settings.history.jsonl
//! <root>/<shop_id>/pages.json
//! ```

use shopcms_core::errors::CmsError;
use std::path::{Path, PathBuf};

use crate::errors::Result;

pub const SETTINGS_FILE: &str = "settings.json";
pub const AUDIT_LOG_FILE: &str = "settings.history.jsonl";
pub const PAGES_FILE: &str = "pages.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopLayout {
    root: PathBuf,
}

impl ShopLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one shop
    ///
    /// # Errors
    ///
    /// `CmsError::InvalidShopId` unless the id is non-empty and made of
    /// ASCII letters, digits, `-` and `_`.
    pub fn shop_dir(&self, shop_id: &str) -> Result<PathBuf> {
        check_shop_id(shop_id)?;
        Ok(self.root.join(shop_id))
    }

    pub fn settings_path(&self, shop_id: &str) -> Result<PathBuf> {
        Ok(self.shop_dir(shop_id)?.join(SETTINGS_FILE))
    }

    pub fn audit_log_path(&self, shop_id: &str) -> Result<PathBuf> {
        Ok(self.shop_dir(shop_id)?.join(AUDIT_LOG_FILE))
    }

    pub fn pages_path(&self, shop_id: &str) -> Result<PathBuf> {
        Ok(self.shop_dir(shop_id)?.join(PAGES_FILE))
    }
}

fn check_shop_id(shop_id: &str) -> Result<()> {
    let valid = !shop_id.is_empty()
        && shop_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CmsError::InvalidShopId {
            shop_id: shop_id.to_string(),
        })
    }
}
