//! Settings and audit log files of a shop

use serde_json::Value;
use shopcms_core::{CmsError, SettingsRepository, ShopSettings};
use tracing::debug;

use crate::atomic::{append_line, atomic_write, read_if_exists, read_lines_lossy};
use crate::errors::{serialization, Result};
use crate::layout::ShopLayout;

/// [`SettingsRepository`] over `settings.json` and `settings.history.jsonl`
///
/// A shop with no files has empty settings and an empty log.
#[derive(Debug, Clone)]
pub struct FsSettingsStore {
    layout: ShopLayout,
}

impl FsSettingsStore {
    pub fn new(layout: ShopLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ShopLayout {
        &self.layout
    }
}

impl SettingsRepository for FsSettingsStore {
    fn load_settings(&self, shop_id: &str) -> Result<ShopSettings> {
        let path = self.layout.settings_path(shop_id)?;
        let Some(text) = read_if_exists(&path)? else {
            debug!(shop_id, "no settings file, using empty settings");
            return Ok(ShopSettings::new());
        };
        match serde_json::from_str::<Value>(&text).map_err(|e| serialization(&path, e))? {
            Value::Object(settings) => Ok(settings),
            other => Err(CmsError::Serialization {
                reason: format!(
                    "{}: expected a JSON object, found {}",
                    path.display(),
                    json_type(&other)
                ),
            }),
        }
    }

    fn write_settings_atomic(&self, shop_id: &str, settings: &ShopSettings) -> Result<()> {
        let path = self.layout.settings_path(shop_id)?;
        let body = serde_json::to_vec_pretty(settings).map_err(|e| serialization(&path, e))?;
        atomic_write(&path, &body)
    }

    fn load_audit_lines(&self, shop_id: &str) -> Result<Vec<String>> {
        read_lines_lossy(&self.layout.audit_log_path(shop_id)?)
    }

    fn append_audit_line(&self, shop_id: &str, line: &str) -> Result<()> {
        append_line(&self.layout.audit_log_path(shop_id)?, line)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
