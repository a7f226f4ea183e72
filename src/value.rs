//! Value Classifier: decides whether a value is *assignable* (a legal
//! leaf/subtree) and whether a root is *manageable*.
//!
//! `serde_json::Value` already restricts what can be represented to
//! null/bool/number/string/array/object, so the classifier's remaining job
//! is a recursion-depth guard and the manageable-root check.

use serde_json::Value;

/// Reserved root-level key holding a document's Versioning Block.
pub const VERSIONING_KEY: &str = "__versioning__";

/// Bound on nesting depth the interception layer's recursive walks will
/// tolerate. Values nested deeper than this fail [`is_assignable`].
const MAX_DEPTH: usize = 512;

/// True iff `v`'s nesting depth stays within [`MAX_DEPTH`].
pub fn is_assignable(v: &Value) -> bool {
    fn depth(v: &Value, budget: usize) -> bool {
        if budget == 0 {
            return false;
        }
        match v {
            Value::Array(items) => items.iter().all(|item| depth(item, budget - 1)),
            Value::Object(map) => map.values().all(|item| depth(item, budget - 1)),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => true,
        }
    }
    depth(v, MAX_DEPTH)
}

/// True iff `v` is a non-array object and every nested value is assignable.
/// Ordered sequences are rejected as roots so the document always has a
/// named slot for the Versioning Block.
pub fn is_manageable(v: &Value) -> bool {
    v.is_object() && is_assignable(v)
}

#[cfg(test)]
#[path = "value_test.rs"]
mod value_test;
