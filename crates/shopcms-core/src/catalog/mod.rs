//! Component kind catalog
//!
//! Assembled once at process start. Registering kinds is phase 1 of
//! building a [`TreeValidator`]; [`CatalogBuilder::bind`] is phase 2.

pub mod builtin;
mod kind;

pub use kind::{
    base_attributes, make_container, make_kind, one_of, AttrSpec, AttrType, AttributeSchema,
    KindSpec,
};

use std::collections::BTreeMap;
use tracing::debug;

use crate::errors::{CmsError, Result};
use crate::tree::TreeValidator;

/// Registered kinds, keyed by tag
#[derive(Debug, Default)]
pub struct Catalog {
    kinds: BTreeMap<String, KindSpec>,
}

impl Catalog {
    pub fn lookup(&self, tag: &str) -> Option<&KindSpec> {
        self.kinds.get(tag)
    }

    /// False for unknown tags as well as leaf kinds
    pub fn is_container(&self, tag: &str) -> bool {
        self.lookup(tag).map(KindSpec::is_container).unwrap_or(false)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &KindSpec> {
        self.kinds.values()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Phase 1 of validator construction
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// [`CmsError::DuplicateKind`] if the tag is already registered.
    pub fn register(&mut self, spec: KindSpec) -> Result<()> {
        if self.catalog.kinds.contains_key(spec.tag()) {
            return Err(CmsError::DuplicateKind {
                kind: spec.tag().to_string(),
            });
        }
        debug!(kind = spec.tag(), container = spec.is_container(), "registered kind");
        self.catalog.kinds.insert(spec.tag().to_string(), spec);
        Ok(())
    }

    /// Register a kind from a bare schema (no base attributes merged)
    ///
    /// # Errors
    ///
    /// [`CmsError::DuplicateKind`] if the tag is already registered.
    pub fn register_kind(
        &mut self,
        tag: impl Into<String>,
        schema: AttributeSchema,
        is_container: bool,
    ) -> Result<()> {
        self.register(KindSpec::new(tag, schema, is_container))
    }

    /// Stop after phase 1; container slots stay unbound
    pub fn build(self) -> Catalog {
        self.catalog
    }

    /// Run phase 2 and return the immutable validator
    ///
    /// # Errors
    ///
    /// See [`TreeValidator::bind`].
    pub fn bind(self) -> Result<TreeValidator> {
        TreeValidator::bind(self.catalog)
    }
}

/// Validator over the built-in storefront kinds
///
/// # Errors
///
/// Only on a defect in the built-in kind list.
pub fn build_default_validator() -> Result<TreeValidator> {
    let mut builder = CatalogBuilder::new();
    builtin::register_builtin_kinds(&mut builder)?;
    builder.bind()
}
