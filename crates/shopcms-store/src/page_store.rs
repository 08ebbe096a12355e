//! Page documents of a shop, stored together in `pages.json`

use shopcms_core::{Page, PageRepository};
use tracing::debug;

use crate::atomic::{atomic_write, read_if_exists};
use crate::errors::{serialization, Result};
use crate::layout::ShopLayout;

/// [`PageRepository`] over one JSON array of pages per shop
///
/// Saving and deleting rewrite the whole file atomically; a save replaces
/// the page with the same id or appends a new one.
#[derive(Debug, Clone)]
pub struct FsPageStore {
    layout: ShopLayout,
}

impl FsPageStore {
    pub fn new(layout: ShopLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ShopLayout {
        &self.layout
    }
}

impl PageRepository for FsPageStore {
    fn load_pages(&self, shop_id: &str) -> Result<Vec<Page>> {
        let path = self.layout.pages_path(shop_id)?;
        match read_if_exists(&path)? {
            Some(text) => serde_json::from_str(&text).map_err(|e| serialization(&path, e)),
            None => Ok(Vec::new()),
        }
    }

    fn save_page(&self, shop_id: &str, page: &Page) -> Result<()> {
        let path = self.layout.pages_path(shop_id)?;
        let mut pages = self.load_pages(shop_id)?;
        match pages.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => *existing = page.clone(),
            None => pages.push(page.clone()),
        }
        let body = serde_json::to_vec_pretty(&pages).map_err(|e| serialization(&path, e))?;
        atomic_write(&path, &body)?;

        debug!(shop_id, page_id = %page.id, page_count = pages.len(), "saved page");
        Ok(())
    }

    fn delete_page(&self, shop_id: &str, page_id: &str) -> Result<bool> {
        let path = self.layout.pages_path(shop_id)?;
        let mut pages = self.load_pages(shop_id)?;
        let before = pages.len();
        pages.retain(|p| p.id != page_id);
        if pages.len() == before {
            return Ok(false);
        }
        let body = serde_json::to_vec_pretty(&pages).map_err(|e| serialization(&path, e))?;
        atomic_write(&path, &body)?;

        debug!(shop_id, page_id, page_count = pages.len(), "deleted page");
        Ok(true)
    }
}
