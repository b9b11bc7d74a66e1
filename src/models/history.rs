//! Append-only audit history.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One entry in the audit log.
///
/// Entries are written only on the success path of significant actions
/// (employee added, payroll updated, rollover done) and are never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier for the entry.
    pub id: u64,
    /// Human-readable description of what happened.
    pub description: String,
    /// When the action happened, in local time.
    pub timestamp: NaiveDateTime,
}
