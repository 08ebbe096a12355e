use super::lifecycle::{self, PageUpdate};
use super::page::Page;
use super::repository::PageRepository;
use crate::clock::{system_clock, Clock};
use crate::errors::{CmsError, Result};
use crate::tree::TreeValidator;

/// Load → change → save for the pages of a shop
pub struct PageService<R: PageRepository> {
    repo: R,
    validator: TreeValidator,
    clock: Clock,
}

impl<R: PageRepository> PageService<R> {
    pub fn new(repo: R, validator: TreeValidator) -> Self {
        Self {
            repo,
            validator,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn validator(&self) -> &TreeValidator {
        &self.validator
    }

    /// # Errors
    ///
    /// Storage failures from the repository.
    pub fn list(&self, shop_id: &str) -> Result<Vec<Page>> {
        self.repo.load_pages(shop_id)
    }

    /// # Errors
    ///
    /// [`CmsError::PageNotFound`] for an unknown page.
    pub fn get(&self, shop_id: &str, page_id: &str) -> Result<Page> {
        self.repo
            .load_page(shop_id, page_id)?
            .ok_or_else(|| CmsError::PageNotFound {
                shop_id: shop_id.to_string(),
                page_id: page_id.to_string(),
            })
    }

    /// Store a new empty draft
    ///
    /// # Errors
    ///
    /// [`CmsError::InvalidInput`] if the id is taken.
    pub fn create(&self, shop_id: &str, page_id: &str, slug: &str, created_by: &str) -> Result<Page> {
        if self.repo.load_page(shop_id, page_id)?.is_some() {
            return Err(CmsError::InvalidInput {
                reason: format!("page '{}' already exists", page_id),
            });
        }
        let page = Page::new(page_id, slug, created_by, (self.clock)());
        self.repo.save_page(shop_id, &page)?;
        Ok(page)
    }

    /// # Errors
    ///
    /// See [`lifecycle::update_page`].
    pub fn update(&self, shop_id: &str, page_id: &str, update: PageUpdate) -> Result<Page> {
        let page = self.get(shop_id, page_id)?;
        let page = lifecycle::update_page(page, update, &self.validator, (self.clock)())?;
        self.repo.save_page(shop_id, &page)?;
        Ok(page)
    }

    /// # Errors
    ///
    /// See [`lifecycle::publish`].
    pub fn publish(&self, shop_id: &str, page_id: &str, published_by: &str) -> Result<Page> {
        let page = self.get(shop_id, page_id)?;
        let page = lifecycle::publish(page, &self.validator, published_by, (self.clock)())?;
        self.repo.save_page(shop_id, &page)?;
        Ok(page)
    }

    /// # Errors
    ///
    /// [`CmsError::PageNotFound`] or storage failures.
    pub fn unpublish(&self, shop_id: &str, page_id: &str) -> Result<Page> {
        let page = lifecycle::unpublish(self.get(shop_id, page_id)?, (self.clock)());
        self.repo.save_page(shop_id, &page)?;
        Ok(page)
    }

    /// # Errors
    ///
    /// See [`lifecycle::revert_to_published`].
    pub fn revert_to_published(&self, shop_id: &str, page_id: &str) -> Result<Page> {
        let page = lifecycle::revert_to_published(self.get(shop_id, page_id)?, (self.clock)())?;
        self.repo.save_page(shop_id, &page)?;
        Ok(page)
    }

    /// # Errors
    ///
    /// [`CmsError::PageNotFound`] for an unknown page, or storage failures.
    pub fn delete(&self, shop_id: &str, page_id: &str) -> Result<()> {
        if self.repo.delete_page(shop_id, page_id)? {
            Ok(())
        } else {
            Err(CmsError::PageNotFound {
                shop_id: shop_id.to_string(),
                page_id: page_id.to_string(),
            })
        }
    }
}
