use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::history::HistoryState;
use crate::tree::Node;

/// Text keyed by locale, e.g. `{"en": "Home", "de": "Startseite"}`
pub type Translated = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoMeta {
    #[serde(default)]
    pub title: Translated,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Translated>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Translated>,
}

/// A storefront page
///
/// Status, timestamps and the publish snapshot are managed by the lifecycle
/// functions in [`crate::document`]; `lastPublishedComponents` changes only
/// on publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub slug: String,
    pub(crate) status: PageStatus,
    pub components: Vec<Node>,
    #[serde(default)]
    pub seo: SeoMeta,
    pub created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) published_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) published_revision_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_published_components: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryState>,
}

impl Page {
    /// New empty draft
    pub fn new(
        id: impl Into<String>,
        slug: impl Into<String>,
        created_by: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            status: PageStatus::Draft,
            components: Vec::new(),
            seo: SeoMeta::default(),
            created_at: now,
            updated_at: now,
            created_by: created_by.into(),
            published_at: None,
            published_by: None,
            published_revision_id: None,
            last_published_components: None,
            history: None,
        }
    }

    pub fn status(&self) -> PageStatus {
        self.status
    }

    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published
    }

    /// Concurrency token for [`update_page`](super::update_page)
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn published_by(&self) -> Option<&str> {
        self.published_by.as_deref()
    }

    pub fn published_revision_id(&self) -> Option<&str> {
        self.published_revision_id.as_deref()
    }

    /// The tree frozen by the last publish
    pub fn last_published_components(&self) -> Option<&[Node]> {
        self.last_published_components.as_deref()
    }
}
