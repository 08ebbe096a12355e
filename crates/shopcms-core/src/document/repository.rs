use super::page::Page;
use crate::errors::Result;

/// Page storage for one or more shops
///
/// Implemented by the persistence layer; the core never touches files.
pub trait PageRepository {
    /// All pages of a shop; a shop without pages yields an empty list
    ///
    /// # Errors
    ///
    /// Storage failures as `CmsError::ReadFailed`.
    fn load_pages(&self, shop_id: &str) -> Result<Vec<Page>>;

    /// # Errors
    ///
    /// Storage failures as `CmsError::WriteFailed`.
    fn save_page(&self, shop_id: &str, page: &Page) -> Result<()>;

    /// Remove a page; `Ok(false)` if the shop has no page with that id
    ///
    /// # Errors
    ///
    /// Storage failures as `CmsError::ReadFailed` or `CmsError::WriteFailed`.
    fn delete_page(&self, shop_id: &str, page_id: &str) -> Result<bool>;

    /// # Errors
    ///
    /// See [`load_pages`](Self::load_pages).
    fn load_page(&self, shop_id: &str, page_id: &str) -> Result<Option<Page>> {
        Ok(self
            .load_pages(shop_id)?
            .into_iter()
            .find(|p| p.id == page_id))
    }
}
