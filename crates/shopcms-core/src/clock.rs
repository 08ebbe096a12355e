//! Injectable wall clock for timestamped operations

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Source of "now" for audit entries and page timestamps
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Clock that always returns `at`
pub fn fixed_clock(at: DateTime<Utc>) -> Clock {
    Arc::new(move || at)
}
