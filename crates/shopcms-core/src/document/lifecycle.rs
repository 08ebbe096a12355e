//! Page lifecycle: draft saves, publish, unpublish and one-click revert

use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Instant;

use super::digest::revision_id;
use super::page::{Page, PageStatus, SeoMeta};
use crate::errors::{CmsError, Result};
use crate::history::HistoryState;
use crate::tree::{Node, TreeValidator};
use crate::{log_op_end, log_op_error, log_op_start};

/// Draft changes to a page
///
/// `expected_updated_at` is the caller's view of the page; a mismatch with
/// the stored value is a [`CmsError::StalePublish`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageUpdate {
    pub expected_updated_at: DateTime<Utc>,
    pub slug: Option<String>,
    pub components: Option<Vec<Node>>,
    pub seo: Option<SeoMeta>,
    pub history: Option<HistoryState>,
}

impl PageUpdate {
    pub fn new(expected_updated_at: DateTime<Utc>) -> Self {
        Self {
            expected_updated_at,
            slug: None,
            components: None,
            seo: None,
            history: None,
        }
    }

    pub fn components(mut self, components: Vec<Node>) -> Self {
        self.components = Some(components);
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn seo(mut self, seo: SeoMeta) -> Self {
        self.seo = Some(seo);
        self
    }

    pub fn history(mut self, history: HistoryState) -> Self {
        self.history = Some(history);
        self
    }
}

fn stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn check_fresh(page: &Page, expected: DateTime<Utc>) -> Result<()> {
    if page.updated_at != expected {
        return Err(CmsError::StalePublish {
            page_id: page.id.clone(),
            expected: stamp(expected),
            actual: stamp(page.updated_at),
        });
    }
    Ok(())
}

/// Save draft changes
///
/// Components and every history snapshot are re-validated; the publish
/// snapshot and status are left as they are.
///
/// # Errors
///
/// [`CmsError::StalePublish`] on a stale `expected_updated_at`, or
/// [`CmsError::Validation`] for an invalid component tree.
pub fn update_page(
    page: Page,
    update: PageUpdate,
    validator: &TreeValidator,
    now: DateTime<Utc>,
) -> Result<Page> {
    log_op_start!("update_page", page_id = %page.id);
    let start = Instant::now();

    let page = update_page_impl(page, update, validator, now).map_err(|e| {
        log_op_error!(
            "update_page",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "update_page",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(page)
}

fn update_page_impl(
    mut page: Page,
    update: PageUpdate,
    validator: &TreeValidator,
    now: DateTime<Utc>,
) -> Result<Page> {
    check_fresh(&page, update.expected_updated_at)?;

    if let Some(components) = update.components {
        page.components = validator.validate_nodes(&components)?;
    }
    if let Some(slug) = update.slug {
        page.slug = slug;
    }
    if let Some(seo) = update.seo {
        page.seo = seo;
    }
    if let Some(history) = update.history {
        page.history = Some(history.validated(validator)?);
    }
    page.updated_at = now;
    Ok(page)
}

/// Publish the current components
///
/// The validated tree is copied into `lastPublishedComponents` and its
/// digest becomes `publishedRevisionId`.
///
/// # Errors
///
/// [`CmsError::Validation`] if the current components do not validate.
pub fn publish(
    page: Page,
    validator: &TreeValidator,
    published_by: &str,
    now: DateTime<Utc>,
) -> Result<Page> {
    log_op_start!("publish", page_id = %page.id);
    let start = Instant::now();

    let page = publish_impl(page, validator, published_by, now).map_err(|e| {
        log_op_error!(
            "publish",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "publish",
        duration_ms = start.elapsed().as_millis() as u64,
        revision_id = page.published_revision_id().unwrap_or_default()
    );
    Ok(page)
}

fn publish_impl(
    mut page: Page,
    validator: &TreeValidator,
    published_by: &str,
    now: DateTime<Utc>,
) -> Result<Page> {
    let validated = validator.validate_nodes(&page.components)?;
    let revision = revision_id(&validated)?;

    page.components = validated.clone();
    page.last_published_components = Some(validated);
    page.published_revision_id = Some(revision);
    page.published_at = Some(now);
    page.published_by = Some(published_by.to_string());
    page.status = PageStatus::Published;
    page.updated_at = now;
    Ok(page)
}

/// Back to draft; the publish snapshot is kept for a later revert
pub fn unpublish(mut page: Page, now: DateTime<Utc>) -> Page {
    page.status = PageStatus::Draft;
    page.updated_at = now;
    page
}

/// Replace the live components with the last published tree
///
/// Status is unchanged; the restored tree is a draft edit like any other.
///
/// # Errors
///
/// [`CmsError::NothingPublished`] if the page was never published.
pub fn revert_to_published(mut page: Page, now: DateTime<Utc>) -> Result<Page> {
    let Some(published) = page.last_published_components.clone() else {
        return Err(CmsError::NothingPublished { page_id: page.id });
    };
    page.components = published;
    page.updated_at = now;
    Ok(page)
}
