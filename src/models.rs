//! models.rs - Core data structures for the scraper
//!
//! Defines ProgressRecord (the only durable entity) and the terminal
//! pipeline outcomes.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fundraising counter itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    pub total: u64,
}

/// The persisted state: the last known total, when we last ran, and which
/// acquisition path produced the value.
///
/// Loaded once at start, mutated at most once per run, written exactly once
/// at the end, even when nothing was extracted, to refresh the timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressRecord {
    pub progress: Progress,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ProgressRecord {
    /// Zero record with a fresh timestamp, used when no prior file exists
    /// or the existing one is unreadable.
    pub fn default_now() -> Self {
        ProgressRecord {
            progress: Progress { total: 0 },
            timestamp: now_iso(),
            source: None,
        }
    }

    /// Accept a newly extracted total. Callers must have validated it
    /// (strictly positive); a nonzero total is never overwritten with zero.
    pub fn commit(&mut self, total: u64, source: &str) {
        self.progress.total = total;
        self.source = Some(source.to_string());
        self.timestamp = now_iso();
    }

    /// No-update outcome: the prior total stays, only the timestamp moves.
    pub fn touch(&mut self) {
        self.timestamp = now_iso();
    }
}

impl fmt::Display for ProgressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} source={} at {}",
            self.progress.total,
            self.source.as_deref().unwrap_or("-"),
            self.timestamp
        )
    }
}

/// Terminal state of a single pipeline pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A strategy produced a valid total; `source` names it.
    Commit { total: u64, source: String },
    /// Nothing valid was extracted; only the timestamp advances.
    NoUpdate,
}

/// ISO-8601 with millisecond precision and a `Z` suffix, the exact shape
/// the data file has always carried.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_zero() {
        let record = ProgressRecord::default_now();
        assert_eq!(record.progress.total, 0);
        assert!(record.source.is_none());
        assert!(record.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_commit_sets_total_and_source() {
        let mut record = ProgressRecord::default_now();
        record.commit(5_000_000, "push_channel");

        assert_eq!(record.progress.total, 5_000_000);
        assert_eq!(record.source.as_deref(), Some("push_channel"));
    }

    #[test]
    fn test_touch_preserves_progress() {
        let mut record = ProgressRecord::default_now();
        record.commit(7_654_321, "attr_counter");
        let before = record.timestamp.clone();

        record.touch();

        assert_eq!(record.progress.total, 7_654_321);
        assert_eq!(record.source.as_deref(), Some("attr_counter"));
        // same shape even if the clock tick is sub-ms
        assert_eq!(record.timestamp.len(), before.len());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut record = ProgressRecord::default_now();
        record.commit(12_345_678, "direct_api");

        let json = serde_json::to_string_pretty(&record).unwrap();
        let back: ProgressRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back, record);
        assert_eq!(back.timestamp, record.timestamp);
    }

    #[test]
    fn test_source_omitted_when_absent() {
        let record = ProgressRecord::default_now();
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("source"));
    }
}
