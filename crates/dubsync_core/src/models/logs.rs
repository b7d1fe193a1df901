//! Engine log entries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::enums::Severity;

/// One line of the engine's job log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    /// Wall-clock label. Empty until stamped when the engine sends none.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub level: Severity,
    pub message: String,
}

/// A `/logs` element: either a full entry or a bare message line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireLogEntry {
    Structured(LogEntry),
    Plain(String),
}

impl WireLogEntry {
    /// Convert a whole snapshot, numbering bare lines by position.
    pub fn into_entries(snapshot: Vec<WireLogEntry>) -> Vec<LogEntry> {
        snapshot
            .into_iter()
            .enumerate()
            .map(|(index, wire)| match wire {
                WireLogEntry::Structured(entry) => entry,
                WireLogEntry::Plain(message) => LogEntry {
                    id: index as u64 + 1,
                    timestamp: String::new(),
                    level: Severity::infer(&message),
                    message,
                },
            })
            .collect()
    }
}

/// Fill in missing timestamps of a fresh snapshot.
///
/// An entry keeps the timestamp it had in `previous` as long as the same
/// id still carries the same message; otherwise it is stamped with `now`.
/// Bare lines are numbered by position, so `previous` is looked up by
/// index first and only indexed by id when that misses.
pub fn stamp_snapshot(previous: &[LogEntry], next: &mut [LogEntry], now: &str) {
    let mut by_id: Option<HashMap<u64, &LogEntry>> = None;

    for entry in next.iter_mut().filter(|e| e.timestamp.is_empty()) {
        let positional = usize::try_from(entry.id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| previous.get(index))
            .filter(|old| old.id == entry.id);

        let old = match positional {
            Some(old) => Some(old),
            None => by_id
                .get_or_insert_with(|| previous.iter().map(|old| (old.id, old)).collect())
                .get(&entry.id)
                .copied(),
        };

        entry.timestamp = old
            .filter(|old| old.message == entry.message && !old.timestamp.is_empty())
            .map(|old| old.timestamp.clone())
            .unwrap_or_else(|| now.to_string());
    }
}
