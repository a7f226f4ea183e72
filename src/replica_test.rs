use super::*;
use crate::document;
use crate::emitter::ChangeEvent;
use crate::entry::LogEntry;
use serde_json::json;

fn snapshot_of(value: Value) -> Value {
    let d = document::create(value).unwrap();
    d.snapshot().unwrap()
}

#[test]
fn test_create_from_snapshot_rejects_non_snapshot() {
    assert_eq!(
        create_from_snapshot(json!({"a": 1})).unwrap_err(),
        Error::InvalidSnapshot
    );
    assert_eq!(
        create_from_snapshot(json!({"__versioning__": {}})).unwrap_err(),
        Error::InvalidSnapshot
    );
}

#[test]
fn test_create_from_snapshot_strips_versioning_and_is_read_only() {
    let snap = snapshot_of(json!({"a": 1}));
    let replica = create_from_snapshot(snap).unwrap();
    assert!(replica.is_replica());
    assert!(replica.is_read_only());
    assert_eq!(replica.detach().unwrap(), json!({"a": 1}));
    assert_eq!(replica.lsn(), 0);
    assert_eq!(replica.set("a", json!(2)).unwrap_err(), Error::ReadOnlyViolation);
}

#[test]
fn test_apply_advances_lsn_and_updates_tree() {
    let replica = create_from_snapshot(snapshot_of(json!({"a": 1}))).unwrap();
    let event = ChangeEvent {
        lsn: 1,
        entry: LogEntry::new_set(vec!["a".to_string()], json!(2)),
    };
    apply(&replica, &event).unwrap();
    assert_eq!(replica.lsn(), 1);
    assert_eq!(replica.detach().unwrap(), json!({"a": 2}));
}

#[test]
fn test_apply_rejects_out_of_sequence_event() {
    let replica = create_from_snapshot(snapshot_of(json!({"a": 1}))).unwrap();
    let event = ChangeEvent {
        lsn: 5,
        entry: LogEntry::new_set(vec!["a".to_string()], json!(2)),
    };
    let err = apply(&replica, &event).unwrap_err();
    assert_eq!(err, Error::OutOfSync { expected: 1, got: 5 });
    assert_eq!(replica.lsn(), 0, "replica must stay at its prior lsn");
}

#[test]
fn test_apply_rechains_event_to_downstream_replicas() {
    let upstream = create_from_snapshot(snapshot_of(json!({"a": 1}))).unwrap();
    let downstream = create(&upstream).unwrap();

    upstream.event_emitter().on_change({
        let downstream = downstream.clone();
        move |ev| apply(&downstream, ev)
    });

    let event = ChangeEvent {
        lsn: 1,
        entry: LogEntry::new_set(vec!["a".to_string()], json!(7)),
    };
    apply(&upstream, &event).unwrap();

    assert_eq!(upstream.detach().unwrap(), json!({"a": 7}));
    assert_eq!(downstream.detach().unwrap(), json!({"a": 7}));
}

#[test]
fn test_create_from_document_snapshots_current_state() {
    let d = document::create(json!({"a": 1})).unwrap();
    d.set("a", json!(42)).unwrap();
    let replica = create(&d).unwrap();
    assert_eq!(replica.detach().unwrap(), json!({"a": 42}));
    assert_eq!(replica.lsn(), d.lsn());
}
