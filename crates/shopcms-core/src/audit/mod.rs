//! Settings diffing and the append-only settings audit trail
//!
//! Log wire format, one entry per line:
//!
//! ```text
//! {"timestamp":"2026-03-01T10:00:00.000Z","diff":{"theme":"dark"}}
//! ```

mod diff;
mod entry;
mod repository;
mod trail;

pub use diff::{apply_diff, compute_diff, SettingsDiff, ShopSettings};
pub use entry::{parse_lines, AuditEntry};
pub use repository::SettingsRepository;
pub use trail::{AuditTrail, SaveOutcome};
