use super::*;
use serde_json::json;

#[test]
fn test_new_log_has_single_entry() {
    let log = Log::new(json!({"prop": 41}));
    assert_eq!(log.len(), 1);
    assert_eq!(log.get(0).unwrap().path(), &[] as &[String]);
}

#[test]
fn test_append_returns_monotone_lsn() {
    let mut log = Log::new(json!({}));
    let lsn1 = log.append(LogEntry::new_set(vec!["a".to_string()], json!(1)));
    let lsn2 = log.append(LogEntry::new_set(vec!["b".to_string()], json!(2)));
    assert_eq!(lsn1, 1);
    assert_eq!(lsn2, 2);
    assert_eq!(log.len(), 3);
}

#[test]
fn test_replay_through_reconstructs_history() {
    let mut log = Log::new(json!({"prop": 41}));
    log.append(LogEntry::new_set(vec!["prop".to_string()], json!(42)));
    assert_eq!(log.replay_through(0).unwrap(), json!({"prop": 41}));
    assert_eq!(log.replay_through(1).unwrap(), json!({"prop": 42}));
    assert_eq!(log.replay_all().unwrap(), json!({"prop": 42}));
}

#[test]
fn test_replay_through_out_of_range() {
    let log = Log::new(json!({}));
    assert_eq!(log.replay_through(5), Err(Error::InvalidVersionId));
}

#[test]
fn test_to_json_array_shape() {
    let mut log = Log::new(json!({}));
    log.append(LogEntry::new_set(vec!["a".to_string()], json!(1)));
    let arr = log.to_json_array();
    assert!(arr.is_array());
    assert_eq!(arr.as_array().unwrap().len(), 2);
}
