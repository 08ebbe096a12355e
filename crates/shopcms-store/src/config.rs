//! Store configuration
//!
//! Read from `SHOPCMS_*` environment variables, after a `.env` file in the
//! working directory (if any) has been loaded into the environment.
//!
//! | variable | default |
//! |---|---|
//! | `SHOPCMS_DATA_ROOT` | `data/shops` |
//! | `SHOPCMS_LOG_PROFILE` | `development` |

use ::config::{Config, Environment};
use serde::Deserialize;
use shopcms_core::errors::CmsError;
use shopcms_core::logging_facility::Profile;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::{config_error, Result};
use crate::layout::ShopLayout;
use crate::page_store::FsPageStore;
use crate::settings_store::FsSettingsStore;

pub const ENV_PREFIX: &str = "SHOPCMS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    pub data_root: PathBuf,
    pub log_profile: String,
}

impl StoreConfig {
    /// Load from `.env` and the process environment
    ///
    /// # Errors
    ///
    /// `CmsError::InvalidInput` if a value cannot be read.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env(None)
    }

    /// Load from an explicit variable map instead of the process environment
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::from_env(Some(vars))
    }

    fn from_env(vars: Option<HashMap<String, String>>) -> Result<Self> {
        Config::builder()
            .set_default("data_root", "data/shops")
            .and_then(|b| b.set_default("log_profile", "development"))
            .map_err(config_error)?
            .add_source(Environment::with_prefix(ENV_PREFIX).source(vars))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error)
    }

    /// # Errors
    ///
    /// `CmsError::InvalidInput` for an unknown profile name.
    pub fn profile(&self) -> Result<Profile> {
        Profile::from_name(&self.log_profile).ok_or_else(|| CmsError::InvalidInput {
            reason: format!("unknown log profile '{}'", self.log_profile),
        })
    }

    /// Initialize logging with the configured profile
    ///
    /// # Errors
    ///
    /// See [`profile`](Self::profile).
    pub fn init_logging(&self) -> Result<()> {
        shopcms_core::logging_facility::init(self.profile()?);
        Ok(())
    }

    pub fn layout(&self) -> ShopLayout {
        ShopLayout::new(self.data_root.clone())
    }

    /// Both repositories over the configured data root
    pub fn open(&self) -> (FsSettingsStore, FsPageStore) {
        let layout = self.layout();
        (FsSettingsStore::new(layout.clone()), FsPageStore::new(layout))
    }
}
