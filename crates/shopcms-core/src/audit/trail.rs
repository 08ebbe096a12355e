use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, warn};

use super::diff::{apply_diff, compute_diff, SettingsDiff, ShopSettings};
use super::entry::{parse_lines, AuditEntry};
use super::repository::SettingsRepository;
use crate::clock::{system_clock, Clock};
use crate::errors::{CmsError, Result};
use crate::{log_op_end, log_op_error, log_op_start};

/// What a settings save did
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub diff: SettingsDiff,
    /// The audit entry written, `None` for a no-op save
    pub entry: Option<AuditEntry>,
}

impl SaveOutcome {
    pub fn appended(&self) -> bool {
        self.entry.is_some()
    }
}

/// Settings persistence with an append-only diff log
///
/// `save_settings` is read → write → append and is not transactional: a
/// concurrent writer between the steps can make a logged diff differ from
/// what another reader observed.
pub struct AuditTrail<R: SettingsRepository> {
    repo: R,
    clock: Clock,
}

impl<R: SettingsRepository> AuditTrail<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
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

    /// # Errors
    ///
    /// Storage failures from the repository.
    pub fn load_settings(&self, shop_id: &str) -> Result<ShopSettings> {
        self.repo.load_settings(shop_id)
    }

    /// Persist `new_settings` and log the change, if there is one
    ///
    /// # Errors
    ///
    /// Storage failures from the repository; an append failure happens
    /// after the new settings were written.
    pub fn save_settings(&self, shop_id: &str, new_settings: &ShopSettings) -> Result<SaveOutcome> {
        log_op_start!("save_settings", shop_id = shop_id);
        let start = Instant::now();

        let outcome = self.save_settings_impl(shop_id, new_settings).map_err(|e| {
            log_op_error!(
                "save_settings",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "save_settings",
            duration_ms = start.elapsed().as_millis() as u64,
            diff_keys = outcome.diff.len(),
            appended = outcome.appended()
        );
        Ok(outcome)
    }

    fn save_settings_impl(&self, shop_id: &str, new_settings: &ShopSettings) -> Result<SaveOutcome> {
        let current = self.repo.load_settings(shop_id)?;
        self.repo.write_settings_atomic(shop_id, new_settings)?;

        let diff = compute_diff(&current, new_settings);
        if diff.is_empty() {
            debug!(shop_id, "settings unchanged, no audit entry");
            return Ok(SaveOutcome { diff, entry: None });
        }

        let entry = AuditEntry::new((self.clock)(), diff.clone());
        self.repo.append_audit_line(shop_id, &entry.to_line()?)?;
        Ok(SaveOutcome {
            diff,
            entry: Some(entry),
        })
    }

    /// Every valid audit entry, in log order
    ///
    /// Lines that fail to parse are dropped and counted in a warning.
    ///
    /// # Errors
    ///
    /// Storage failures from the repository.
    pub fn diff_history(&self, shop_id: &str) -> Result<Vec<AuditEntry>> {
        log_op_start!("diff_history", shop_id = shop_id);
        let start = Instant::now();

        let lines = self.repo.load_audit_lines(shop_id).map_err(|e| {
            log_op_error!(
                "diff_history",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;
        let (entries, dropped) = parse_lines(&lines);
        if dropped > 0 {
            warn!(shop_id, dropped_lines = dropped, "dropped invalid audit lines");
        }

        log_op_end!(
            "diff_history",
            duration_ms = start.elapsed().as_millis() as u64,
            entry_count = entries.len()
        );
        Ok(entries)
    }

    /// Entries with `from <= timestamp <= to`; open bounds when `None`
    ///
    /// # Errors
    ///
    /// See [`diff_history`](Self::diff_history).
    pub fn diff_history_between(
        &self,
        shop_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<AuditEntry>> {
        Ok(self
            .diff_history(shop_id)?
            .into_iter()
            .filter(|e| from.map_or(true, |from| e.timestamp >= from))
            .filter(|e| to.map_or(true, |to| e.timestamp <= to))
            .collect())
    }

    /// Reconstruct the settings as of `timestamp` without saving them
    ///
    /// The base is every current key that no audit entry ever touched; the
    /// entries at or before `timestamp` are replayed over it in log order.
    ///
    /// Entries record new values only. A key whose first logged change
    /// comes after `timestamp` has no known earlier value, so it is absent
    /// from the result even if it existed before the log started.
    ///
    /// # Errors
    ///
    /// [`CmsError::RevertTargetNotFound`] if no entry is at or before
    /// `timestamp`, plus storage failures.
    pub fn settings_at(&self, shop_id: &str, timestamp: DateTime<Utc>) -> Result<ShopSettings> {
        let entries = self.diff_history(shop_id)?;
        let current = self.repo.load_settings(shop_id)?;
        reconstruct(shop_id, &current, &entries, timestamp)
    }

    /// Restore the settings as of `timestamp`
    ///
    /// The restore is saved like any other edit, so it appends its own
    /// audit entry; nothing is erased from the log. Keys first logged after
    /// `timestamp` are removed, see [`settings_at`](Self::settings_at).
    ///
    /// # Errors
    ///
    /// See [`settings_at`](Self::settings_at) and
    /// [`save_settings`](Self::save_settings).
    pub fn revert(&self, shop_id: &str, timestamp: DateTime<Utc>) -> Result<ShopSettings> {
        log_op_start!("revert", shop_id = shop_id, target = %timestamp);
        let start = Instant::now();

        let restored = self
            .settings_at(shop_id, timestamp)
            .and_then(|restored| {
                self.save_settings(shop_id, &restored)?;
                Ok(restored)
            })
            .map_err(|e| {
                log_op_error!(
                    "revert",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "revert",
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(restored)
    }
}

fn reconstruct(
    shop_id: &str,
    current: &ShopSettings,
    entries: &[AuditEntry],
    timestamp: DateTime<Utc>,
) -> Result<ShopSettings> {
    let touched: HashSet<&str> = entries
        .iter()
        .flat_map(|e| e.diff.keys().map(String::as_str))
        .collect();
    let mut state: ShopSettings = current
        .iter()
        .filter(|(key, _)| !touched.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut replayed = 0;
    for entry in entries.iter().filter(|e| e.timestamp <= timestamp) {
        apply_diff(&mut state, &entry.diff);
        replayed += 1;
    }
    if replayed == 0 {
        return Err(CmsError::RevertTargetNotFound {
            shop_id: shop_id.to_string(),
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
    }
    Ok(state)
}
