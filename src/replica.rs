//! Replica: a read-only, out-of-process-friendly mirror of a Document's
//! tree, advanced only by applying [`ChangeEvent`]s received from an
//! upstream Emitter.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::trace;

use crate::emitter::{ChangeEvent, Emitter};
use crate::error::{Error, Result};
use crate::value::VERSIONING_KEY;
use crate::view::{DocView, ReplicaInner, Store};

/// Build a replica from a snapshot value (the shape `snapshot(doc)`
/// produces: a plain tree plus `__versioning__.lsn`).
pub fn create_from_snapshot(snapshot: Value) -> Result<DocView> {
    let lsn = snapshot
        .get(VERSIONING_KEY)
        .and_then(|v| v.get("lsn"))
        .and_then(Value::as_u64)
        .ok_or(Error::InvalidSnapshot)?;

    let mut root = match snapshot {
        Value::Object(map) => Value::Object(map),
        _ => return Err(Error::InvalidSnapshot),
    };
    if let Value::Object(map) = &mut root {
        map.remove(VERSIONING_KEY);
    }

    let inner = ReplicaInner { root, lsn };
    Ok(DocView::new(
        Store::Replica(Rc::new(RefCell::new(inner))),
        Rc::new(Emitter::new()),
    ))
}

/// Build a replica from either another replica or a managed document's
/// root view: snapshot `source` and hand it to [`create_from_snapshot`].
/// The new replica is not linked to `source`; a caller wanting live
/// updates must separately subscribe to `source`'s emitter and call
/// [`apply`] as events arrive.
pub fn create(source: &DocView) -> Result<DocView> {
    let snapshot = source.snapshot()?;
    create_from_snapshot(snapshot)
}

/// Advance `replica` by one [`ChangeEvent`].
///
/// Fails `OutOfSync` if `event.lsn != replica.lsn() + 1`, leaving the
/// replica at its prior LSN. On success the entry is applied to the
/// private tree, the LSN is incremented, and the same event is re-emitted
/// on the replica's own emitter so downstream replicas can chain.
pub fn apply(replica: &DocView, event: &ChangeEvent) -> Result<()> {
    let rc = match &replica.store {
        Store::Replica(rc) => rc,
        _ => return Err(Error::NotReplica),
    };

    {
        let mut inner = rc.borrow_mut();
        let expected = inner.lsn + 1;
        if event.lsn != expected {
            return Err(Error::OutOfSync {
                expected,
                got: event.lsn,
            });
        }
        event.entry.apply(&mut inner.root)?;
        inner.lsn = event.lsn;
    }
    trace!(lsn = event.lsn, "replica applied change event");
    replica.event_emitter().emit(event)
}

#[cfg(test)]
#[path = "replica_test.rs"]
mod replica_test;
