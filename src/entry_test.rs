use super::*;
use serde_json::json;

#[test]
fn test_entry_zero_replaces_whole_tree() {
    let entry = LogEntry::new_set(vec![], json!({"prop": 41}));
    let mut tree = json!(null);
    entry.apply(&mut tree).unwrap();
    assert_eq!(tree, json!({"prop": 41}));
}

#[test]
fn test_set_on_object_key() {
    let mut tree = json!({"prop": 41});
    let entry = LogEntry::new_set(vec!["prop".to_string()], json!(42));
    entry.apply(&mut tree).unwrap();
    assert_eq!(tree, json!({"prop": 42}));
}

#[test]
fn test_set_nested_path() {
    let mut tree = json!({"a": {"b": 1}});
    let entry = LogEntry::new_set(vec!["a".to_string(), "b".to_string()], json!(2));
    entry.apply(&mut tree).unwrap();
    assert_eq!(tree, json!({"a": {"b": 2}}));
}

#[test]
fn test_delete_on_object_key() {
    let mut tree = json!({"a": 1, "b": 2});
    let entry = LogEntry::new_delete(vec!["a".to_string()]);
    entry.apply(&mut tree).unwrap();
    assert_eq!(tree, json!({"b": 2}));
}

#[test]
fn test_set_array_index_extends_with_null() {
    let mut tree = json!({"a": [0]});
    let entry = LogEntry::new_set(vec!["a".to_string(), "2".to_string()], json!(9));
    entry.apply(&mut tree).unwrap();
    assert_eq!(tree, json!({"a": [0, null, 9]}));
}

#[test]
fn test_delete_array_index_shifts() {
    let mut tree = json!({"a": [0, 1, 2]});
    let entry = LogEntry::new_delete(vec!["a".to_string(), "0".to_string()]);
    entry.apply(&mut tree).unwrap();
    assert_eq!(tree, json!({"a": [1, 2]}));
}

#[test]
fn test_malformed_path_fails() {
    let mut tree = json!({"a": 1});
    let entry = LogEntry::new_set(vec!["missing".to_string(), "b".to_string()], json!(1));
    assert_eq!(entry.apply(&mut tree), Err(Error::MalformedEntry));
}

#[test]
fn test_delete_entry_zero_is_malformed() {
    let mut tree = json!({});
    let entry = LogEntry::new_delete(vec![]);
    assert_eq!(entry.apply(&mut tree), Err(Error::MalformedEntry));
}

#[test]
fn test_set_null_round_trips_through_json_as_a_set_not_a_delete() {
    let entry = LogEntry::new_set(vec!["a".to_string()], json!(null));
    let j = entry.to_json();
    let back: LogEntry = serde_json::from_value(j).unwrap();
    assert_eq!(back.op(), Op::Set);
    assert_eq!(back.value(), Some(&json!(null)));

    let mut tree = json!({"a": 1});
    back.apply(&mut tree).unwrap();
    assert_eq!(tree, json!({"a": null}));
}

#[test]
fn test_to_json_shape() {
    let entry = LogEntry::new_set(vec!["a".to_string()], json!(1));
    let j = entry.to_json();
    assert_eq!(j["op"], json!("SET"));
    assert_eq!(j["path"], json!(["a"]));
    assert_eq!(j["value"], json!(1));

    let entry = LogEntry::new_delete(vec!["a".to_string()]);
    let j = entry.to_json();
    assert_eq!(j["op"], json!("DELETE"));
    assert_eq!(j["value"], json!(null));
}
