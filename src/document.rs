//! Managed Document: the `create` entry point that wraps a plain value
//! (or re-attaches a previously detached-with-history value) as a
//! [`DocView`] backed by a fresh, private log and emitter.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::emitter::Emitter;
use crate::entry::{LogEntry, Op};
use crate::error::{Error, Result};
use crate::log::Log;
use crate::value::{is_manageable, VERSIONING_KEY};
use crate::view::{DocView, DocumentInner, Store};

/// Wrap `plain` as a managed [`DocView`].
///
/// If `plain` carries no `__versioning__` field, a fresh log is installed
/// with entry 0 set to a deep copy of `plain`. If it does carry one, it is
/// treated as a previously `detach_preserve_version_data`-d value: the log
/// is rebuilt from `__versioning__.log` and validated by replaying it and
/// comparing the result, structurally, against `plain` with
/// `__versioning__` stripped.
pub fn create(plain: Value) -> Result<DocView> {
    if !is_manageable(&plain) {
        return Err(Error::NonManageable);
    }

    let mut working = match plain {
        Value::Object(map) => map,
        _ => unreachable!("is_manageable requires an object"),
    };

    let log = match working.get(VERSIONING_KEY).cloned() {
        None => Log::new(Value::Object(working.clone())),
        Some(versioning) => {
            working.remove(VERSIONING_KEY);
            let entries = reconstruct_entries(&versioning)?;
            let log = Log::from_entries(entries);
            let replayed = log.replay_all()?;
            if replayed != Value::Object(working.clone()) {
                return Err(Error::InvalidVersioningData);
            }
            debug!(entries = log.len(), "re-attached document from versioning data");
            log
        }
    };

    let inner = DocumentInner {
        root: Value::Object(working),
        log,
    };
    Ok(DocView::new(
        Store::Document(Rc::new(RefCell::new(inner))),
        Rc::new(Emitter::new()),
    ))
}

fn reconstruct_entries(versioning: &Value) -> Result<Vec<LogEntry>> {
    let log_array = versioning
        .get("log")
        .and_then(Value::as_array)
        .ok_or(Error::InvalidVersioningData)?;
    let entries: Vec<LogEntry> = log_array
        .iter()
        .cloned()
        .map(serde_json::from_value)
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::InvalidVersioningData)?;
    match entries.first() {
        Some(first) if first.op() == Op::Set && first.path().is_empty() => Ok(entries),
        _ => Err(Error::InvalidVersioningData),
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;
