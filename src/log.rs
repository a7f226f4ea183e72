//! The ordered sequence of Log Entries for a single Document: the
//! authoritative, replayable history the Interception Layer appends to.

use serde_json::Value;
use tracing::trace;

use crate::entry::LogEntry;
use crate::error::{Error, Result};

/// Ordered, append-only sequence of [`LogEntry`] values. Entry 0 is always
/// `{Set, [], initial-root-value}`; the LSN of an entry is its index.
#[derive(Debug, Clone)]
pub struct Log {
    entries: Vec<LogEntry>,
}

impl Log {
    /// Start a fresh log with `initial` as entry 0.
    pub(crate) fn new(initial: Value) -> Log {
        Log {
            entries: vec![LogEntry::new_set(vec![], initial)],
        }
    }

    /// Reconstruct a log from its canonical entries (used on re-attach).
    /// Caller is responsible for validating entry 0's shape beforehand.
    pub(crate) fn from_entries(entries: Vec<LogEntry>) -> Log {
        Log { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, lsn: usize) -> Option<&LogEntry> {
        self.entries.get(lsn)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Append `entry`, returning its freshly assigned LSN.
    pub(crate) fn append(&mut self, entry: LogEntry) -> u64 {
        self.entries.push(entry);
        let lsn = (self.entries.len() - 1) as u64;
        trace!(lsn, "appended log entry");
        lsn
    }

    /// Replay `entries[0..=upto]` onto a fresh tree and return the result.
    pub(crate) fn replay_through(&self, upto: usize) -> Result<Value> {
        if upto >= self.entries.len() {
            return Err(Error::InvalidVersionId);
        }
        let mut tree = self.entries[0]
            .value()
            .cloned()
            .ok_or(Error::MalformedEntry)?;
        for entry in &self.entries[1..=upto] {
            entry.apply(&mut tree)?;
        }
        Ok(tree)
    }

    /// Replay the entire log, equivalent to `replay_through(len() - 1)`.
    pub(crate) fn replay_all(&self) -> Result<Value> {
        self.replay_through(self.entries.len() - 1)
    }

    /// Serialize the log as a JSON array of entry objects, for
    /// `__versioning__.log`.
    pub(crate) fn to_json_array(&self) -> Value {
        Value::Array(self.entries.iter().map(LogEntry::to_json).collect())
    }
}

#[cfg(test)]
#[path = "log_test.rs"]
mod log_test;
