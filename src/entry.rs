//! Log Entry: an immutable record of one mutation, and the pure function
//! that applies it to a plain tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// The operation a [`LogEntry`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Op {
    Set,
    Delete,
}

/// An immutable record of one mutation against the tree.
///
/// Log Entry 0 is always `{Set, [], initial-root-value}`. Entries at index
/// `i >= 1` describe a delta against the tree produced by applying all
/// earlier entries to entry 0's value.
///
/// `value` is unconditionally present on the wire, not `Option<Value>`:
/// an `Option<Value>` would serialize `Some(Value::Null)` (an explicit
/// `SET` of `null`) identically to `None` (no value at all, the shape a
/// `DELETE` carries), and deserializing JSON `null` back into
/// `Option<Value>` always yields `None` — collapsing the two and losing
/// the explicit-null SET on re-attach. Using a plain `Value` with
/// `Value::Null` as `DELETE`'s unread placeholder keeps the two distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    op: Op,
    path: Vec<String>,
    value: Value,
}

impl LogEntry {
    pub(crate) fn new_set(path: Vec<String>, value: Value) -> LogEntry {
        LogEntry {
            op: Op::Set,
            path,
            value,
        }
    }

    pub(crate) fn new_delete(path: Vec<String>) -> LogEntry {
        LogEntry {
            op: Op::Delete,
            path,
            value: Value::Null,
        }
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// `Some` for a `SET` (even a `SET` of `null`), `None` for a
    /// `DELETE` — `DELETE`'s stored `value` is an unread placeholder.
    pub fn value(&self) -> Option<&Value> {
        match self.op {
            Op::Set => Some(&self.value),
            Op::Delete => None,
        }
    }

    /// Serialize this entry to its JSON-shaped log representation,
    /// `{"op": "SET"|"DELETE", "path": [...], "value": value-or-null}`.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).expect("LogEntry always serializes")
    }

    /// Apply this entry to `tree` in place.
    ///
    /// An empty path means "replace the tree's contents wholesale" (used
    /// only for entry 0, conceptually). A non-empty path walks to the
    /// parent container and mutates the final key/index.
    pub(crate) fn apply(&self, tree: &mut Value) -> Result<()> {
        if self.path.is_empty() {
            match self.op {
                Op::Set => {
                    *tree = self.value.clone();
                    Ok(())
                }
                Op::Delete => Err(Error::MalformedEntry),
            }
        } else {
            let (last, parents) = self.path.split_last().expect("non-empty path");
            let parent = navigate_mut(tree, parents)?;
            apply_at(parent, last, self.op, self.value.clone())
        }
    }
}

/// Walk `tree` following `path`, returning a mutable reference to the
/// container the walk lands on.
fn navigate_mut<'a>(tree: &'a mut Value, path: &[String]) -> Result<&'a mut Value> {
    let mut cur = tree;
    for key in path {
        cur = match cur {
            Value::Object(map) => map.get_mut(key).ok_or(Error::MalformedEntry)?,
            Value::Array(items) => {
                let idx: usize = key.parse().map_err(|_| Error::MalformedEntry)?;
                items.get_mut(idx).ok_or(Error::MalformedEntry)?
            }
            _ => return Err(Error::MalformedEntry),
        };
    }
    Ok(cur)
}

fn apply_at(container: &mut Value, key: &str, op: Op, value: Value) -> Result<()> {
    match container {
        Value::Object(map) => match op {
            Op::Set => {
                map.insert(key.to_string(), value);
                Ok(())
            }
            Op::Delete => {
                map.remove(key).ok_or(Error::MalformedEntry)?;
                Ok(())
            }
        },
        Value::Array(items) => {
            let idx: usize = key.parse().map_err(|_| Error::MalformedEntry)?;
            match op {
                Op::Set => {
                    if idx < items.len() {
                        items[idx] = value;
                    } else {
                        items.resize(idx, Value::Null);
                        items.push(value);
                    }
                    Ok(())
                }
                Op::Delete => {
                    if idx >= items.len() {
                        return Err(Error::MalformedEntry);
                    }
                    items.remove(idx);
                    Ok(())
                }
            }
        }
        _ => Err(Error::MalformedEntry),
    }
}

#[cfg(test)]
#[path = "entry_test.rs"]
mod entry_test;
