use super::diff::ShopSettings;
use crate::errors::Result;

/// Settings storage consumed by [`AuditTrail`](super::AuditTrail)
///
/// Missing data is not an error: a shop without settings has an empty
/// settings map and no audit lines.
pub trait SettingsRepository {
    /// # Errors
    ///
    /// Storage failures as `CmsError::ReadFailed`.
    fn load_settings(&self, shop_id: &str) -> Result<ShopSettings>;

    /// Replace the settings so that readers never see a partial document
    ///
    /// # Errors
    ///
    /// Storage failures as `CmsError::WriteFailed`.
    fn write_settings_atomic(&self, shop_id: &str, settings: &ShopSettings) -> Result<()>;

    /// Raw audit log lines in file order
    ///
    /// # Errors
    ///
    /// Storage failures as `CmsError::ReadFailed`.
    fn load_audit_lines(&self, shop_id: &str) -> Result<Vec<String>>;

    /// Append one line to the audit log
    ///
    /// # Errors
    ///
    /// Storage failures as `CmsError::WriteFailed`.
    fn append_audit_line(&self, shop_id: &str, line: &str) -> Result<()>;
}
