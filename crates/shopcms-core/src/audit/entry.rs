//! Audit log entries and their newline-delimited JSON form

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::diff::SettingsDiff;
use crate::errors::Result;

/// One immutable record of a settings change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub diff: SettingsDiff,
}

impl AuditEntry {
    /// Timestamps are kept at millisecond precision, as written to the log
    pub fn new(timestamp: DateTime<Utc>, diff: SettingsDiff) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(3),
            diff,
        }
    }

    /// Serialize as a single log line (without the trailing newline)
    ///
    /// # Errors
    ///
    /// `CmsError::Serialization` if the diff cannot be encoded.
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse one log line; `None` for anything that is not a valid entry
    pub fn parse_line(line: &str) -> Option<Self> {
        serde_json::from_str::<AuditEntry>(line)
            .ok()
            .filter(|entry| !entry.diff.is_empty())
    }
}

/// Parse log lines in order, skipping blank lines
///
/// Returns the valid entries and the number of non-blank lines dropped.
pub fn parse_lines<I, S>(lines: I) -> (Vec<AuditEntry>, usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entries = Vec::new();
    let mut dropped = 0;
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        match AuditEntry::parse_line(line) {
            Some(entry) => entries.push(entry),
            None => dropped += 1,
        }
    }
    (entries, dropped)
}

mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
