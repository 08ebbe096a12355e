//! Error helpers for shopcms-store
//!
//! Storage failures are reported with the core `CmsError` variants so the
//! core can propagate them without interpretation.

use shopcms_core::errors::CmsError;
use std::path::Path;

/// Result type alias using the core error
pub type Result<T> = std::result::Result<T, CmsError>;

/// Create a read failure for `target`
pub fn io_read(target: &Path, err: std::io::Error) -> CmsError {
    CmsError::ReadFailed {
        target: target.display().to_string(),
        reason: err.to_string(),
    }
}

/// Create a write failure for `target`
pub fn io_write(target: &Path, err: std::io::Error) -> CmsError {
    CmsError::WriteFailed {
        target: target.display().to_string(),
        reason: err.to_string(),
    }
}

/// Create a serialization error for the document at `target`
pub fn serialization(target: &Path, err: serde_json::Error) -> CmsError {
    CmsError::Serialization {
        reason: format!("{}: {}", target.display(), err),
    }
}

/// Create an error for configuration that cannot be loaded
pub fn config_error(err: ::config::ConfigError) -> CmsError {
    CmsError::InvalidInput {
        reason: format!("invalid store configuration: {}", err),
    }
}
