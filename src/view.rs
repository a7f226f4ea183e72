//! Interception Layer: wraps a tree with a recursive `DocView` cursor that
//! intercepts read/write/delete and forwards the underlying operations
//! while appending to the log and emitting change events.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use serde_json::{json, Value};
use tracing::trace;

use crate::emitter::{ChangeEvent, Emitter};
use crate::entry::LogEntry;
use crate::error::{Error, Result};
use crate::log::Log;
use crate::value::{is_assignable, VERSIONING_KEY};

pub(crate) struct DocumentInner {
    pub(crate) root: Value,
    pub(crate) log: Log,
}

pub(crate) struct ReplicaInner {
    pub(crate) root: Value,
    pub(crate) lsn: u64,
}

#[derive(Clone)]
pub(crate) enum Store {
    Document(Rc<RefCell<DocumentInner>>),
    Replica(Rc<RefCell<ReplicaInner>>),
    Frozen(Rc<Value>),
}

/// A read result: either a scalar value or a wrapped view over a nested
/// object/array.
#[derive(Debug, Clone)]
pub enum Field {
    Value(Value),
    View(DocView),
}

/// The managed surface at a specific path: a cursor over a shared,
/// reference-counted tree. Cloning a `DocView` is cheap (an `Rc` clone);
/// it does not duplicate the underlying data.
#[derive(Clone)]
pub struct DocView {
    pub(crate) store: Store,
    emitter: Rc<Emitter>,
    path: Vec<String>,
    read_only: bool,
}

impl std::fmt::Debug for DocView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocView")
            .field("path", &self.path)
            .field("read_only", &self.read_only)
            .finish()
    }
}

fn navigate<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = match cur {
            Value::Object(map) => map.get(key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Walk as far as `path` resolves and return the deepest node reached,
/// falling back to `root` itself if even the first key fails to resolve.
fn navigate_deepest<'a>(root: &'a Value, path: &[String]) -> &'a Value {
    let mut cur = root;
    for key in path {
        let next = match cur {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(n) => cur = n,
            None => break,
        }
    }
    cur
}

impl DocView {
    pub(crate) fn new(store: Store, emitter: Rc<Emitter>) -> DocView {
        let read_only = matches!(store, Store::Replica(_) | Store::Frozen(_));
        DocView {
            store,
            emitter,
            path: vec![],
            read_only,
        }
    }

    fn child(&self, key: &str) -> DocView {
        let mut path = self.path.clone();
        path.push(key.to_string());
        DocView {
            store: self.store.clone(),
            emitter: Rc::clone(&self.emitter),
            path,
            read_only: self.read_only,
        }
    }

    fn visit_node<R>(&self, f: impl FnOnce(Option<&Value>) -> R) -> R {
        match &self.store {
            Store::Document(rc) => {
                let inner = rc.borrow();
                f(navigate(&inner.root, &self.path))
            }
            Store::Replica(rc) => {
                let inner = rc.borrow();
                f(navigate(&inner.root, &self.path))
            }
            Store::Frozen(rc) => f(navigate(rc, &self.path)),
        }
    }

    /// The absolute path from the document root to this view.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// True iff writes through this view are rejected unconditionally
    /// (a replica, a frozen/read-only projection such as the log, or the
    /// reserved `__versioning__` slot).
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_replica(&self) -> bool {
        matches!(self.store, Store::Replica(_))
    }

    fn versioning_view(&self) -> DocView {
        let value = match &self.store {
            Store::Document(rc) => {
                let inner = rc.borrow();
                json!({ "log": inner.log.to_json_array() })
            }
            Store::Replica(rc) => {
                let inner = rc.borrow();
                json!({ "lsn": inner.lsn })
            }
            Store::Frozen(rc) => (**rc).clone(),
        };
        DocView {
            store: Store::Frozen(Rc::new(value)),
            emitter: Rc::clone(&self.emitter),
            path: vec![],
            read_only: true,
        }
    }

    /// Read `key` off the node this view points to. Scalars come back as
    /// owned values; nested objects/arrays come back as a fresh view.
    /// Reading `"__versioning__"` off the document root synthesizes a
    /// read-only view over the Versioning Block.
    pub fn get(&self, key: &str) -> Option<Field> {
        if self.path.is_empty() && key == VERSIONING_KEY {
            return Some(Field::View(self.versioning_view()));
        }
        self.visit_node(|node| {
            let node = node?;
            let child = match node {
                Value::Object(map) => map.get(key)?,
                Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
            Some(match child {
                Value::Object(_) | Value::Array(_) => Field::View(self.child(key)),
                other => Field::Value(other.clone()),
            })
        })
    }

    /// Enumerate the keys (or stringified indices) of the container this
    /// view points to. The document root additionally enumerates the
    /// reserved `"__versioning__"` field.
    pub fn keys(&self) -> Vec<String> {
        let mut ks = self.visit_node(|node| match node {
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            Some(Value::Array(items)) => (0..items.len()).map(|i| i.to_string()).collect(),
            _ => vec![],
        });
        if self.path.is_empty() && matches!(self.store, Store::Document(_)) {
            ks.push(VERSIONING_KEY.to_string());
        }
        ks
    }

    /// Materialize the subtree this view points to as an owned `Value`.
    pub fn to_value(&self) -> Value {
        self.visit_node(|node| node.cloned()).unwrap_or(Value::Null)
    }

    fn ensure_writable(&self, key: &str) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnlyViolation);
        }
        if self.path.is_empty() && key == VERSIONING_KEY {
            return Err(Error::ReadOnlyViolation);
        }
        Ok(())
    }

    /// Write `value` at `key` under this view's node, appending one
    /// [`LogEntry`] and emitting one [`ChangeEvent`].
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        self.ensure_writable(key)?;
        if !is_assignable(&value) {
            return Err(Error::NonAssignableValue);
        }
        let rc = match &self.store {
            Store::Document(rc) => rc,
            _ => return Err(Error::ReadOnlyViolation),
        };
        let mut full_path = self.path.clone();
        full_path.push(key.to_string());
        let entry = LogEntry::new_set(full_path, value);
        let lsn = {
            let mut inner = rc.borrow_mut();
            if navigate(&inner.root, &self.path).is_none() {
                return Err(Error::OrphanedView);
            }
            entry.apply(&mut inner.root)?;
            inner.log.append(entry.clone())
        };
        trace!(lsn, key, "document set");
        self.emitter.emit(&ChangeEvent { lsn, entry })?;
        Ok(())
    }

    /// Remove `key` from this view's node, appending one [`LogEntry`] and
    /// emitting one [`ChangeEvent`].
    pub fn delete(&self, key: &str) -> Result<()> {
        self.ensure_writable(key)?;
        let rc = match &self.store {
            Store::Document(rc) => rc,
            _ => return Err(Error::ReadOnlyViolation),
        };
        let mut full_path = self.path.clone();
        full_path.push(key.to_string());
        let entry = LogEntry::new_delete(full_path);
        let lsn = {
            let mut inner = rc.borrow_mut();
            if navigate(&inner.root, &self.path).is_none() {
                return Err(Error::OrphanedView);
            }
            entry.apply(&mut inner.root)?;
            inner.log.append(entry.clone())
        };
        trace!(lsn, key, "document delete");
        self.emitter.emit(&ChangeEvent { lsn, entry })?;
        Ok(())
    }

    // -- Document facade: version history -----------------------------

    pub fn version_count(&self) -> Result<usize> {
        match &self.store {
            Store::Document(rc) => Ok(rc.borrow().log.len()),
            _ => Err(Error::NotManaged),
        }
    }

    /// Reconstruct the tree as of LSN `k`, then navigate into it along
    /// this view's path, returning the deepest resolvable value if the
    /// path predates this era.
    pub fn restore_version(&self, k: usize) -> Result<Value> {
        match &self.store {
            Store::Document(rc) => {
                let historical = rc.borrow().log.replay_through(k)?;
                Ok(navigate_deepest(&historical, &self.path).clone())
            }
            _ => Err(Error::NotManaged),
        }
    }

    pub fn detach(&self) -> Result<Value> {
        match &self.store {
            Store::Document(rc) => Ok(rc.borrow().root.clone()),
            _ => Err(Error::NotManaged),
        }
    }

    pub fn detach_preserve_version_data(&self) -> Result<Value> {
        match &self.store {
            Store::Document(rc) => {
                let inner = rc.borrow();
                let mut out = inner.root.clone();
                if let Value::Object(map) = &mut out {
                    map.insert(
                        VERSIONING_KEY.to_string(),
                        json!({ "log": inner.log.to_json_array() }),
                    );
                }
                Ok(out)
            }
            _ => Err(Error::NotManaged),
        }
    }

    /// A plain value plus a synthesized `__versioning__ = { lsn }`, fit to
    /// hand to [`crate::replica::create_from_snapshot`]. Works on both a
    /// document (`lsn = log.len() - 1`) and a replica (`lsn` carried
    /// directly on `ReplicaInner`), so a replica can itself be the source
    /// of another replica.
    pub fn snapshot(&self) -> Result<Value> {
        let (root, lsn) = match &self.store {
            Store::Document(rc) => {
                let inner = rc.borrow();
                (inner.root.clone(), (inner.log.len() - 1) as u64)
            }
            Store::Replica(rc) => {
                let inner = rc.borrow();
                (inner.root.clone(), inner.lsn)
            }
            Store::Frozen(_) => return Err(Error::NotManaged),
        };
        let mut out = root;
        if let Value::Object(map) = &mut out {
            map.insert(VERSIONING_KEY.to_string(), json!({ "lsn": lsn }));
        }
        Ok(out)
    }

    pub fn root(&self) -> Result<DocView> {
        match &self.store {
            Store::Document(_) => Ok(DocView {
                store: self.store.clone(),
                emitter: Rc::clone(&self.emitter),
                path: vec![],
                read_only: false,
            }),
            _ => Err(Error::NotManaged),
        }
    }

    pub fn log(&self) -> Result<DocView> {
        match &self.store {
            Store::Document(rc) => {
                let array = rc.borrow().log.to_json_array();
                Ok(DocView {
                    store: Store::Frozen(Rc::new(array)),
                    emitter: Rc::clone(&self.emitter),
                    path: vec![],
                    read_only: true,
                })
            }
            _ => Err(Error::NotManaged),
        }
    }

    pub fn event_emitter(&self) -> Rc<Emitter> {
        Rc::clone(&self.emitter)
    }

    /// The current LSN: `log.len() - 1` for a document, the replicated
    /// LSN for a replica, and `0` for a frozen projection.
    pub fn lsn(&self) -> u64 {
        match &self.store {
            Store::Document(rc) => (rc.borrow().log.len() - 1) as u64,
            Store::Replica(rc) => rc.borrow().lsn,
            Store::Frozen(_) => 0,
        }
    }

    // -- Ordered-sequence mutations -------------------------------------

    fn as_array(&self) -> Result<Vec<Value>> {
        self.visit_node(|node| match node {
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(_) => Err(Error::MalformedEntry),
            None => Err(Error::OrphanedView),
        })
    }

    /// Decompose the difference between `old` and `new` into ascending
    /// per-index SETs for growth/changed slots, followed by trailing
    /// tail-deletes for net shrinkage (see DESIGN.md for why deletes must
    /// run from the tail backward on a dense `Vec`-backed array).
    fn apply_array_diff(&self, old: &[Value], new: &[Value]) -> Result<()> {
        for (i, value) in new.iter().enumerate() {
            if i >= old.len() || &old[i] != value {
                self.set(&i.to_string(), value.clone())?;
            }
        }
        let to_remove = old.len().saturating_sub(new.len());
        for _ in 0..to_remove {
            let cur_len = self.as_array()?.len();
            self.delete(&(cur_len - 1).to_string())?;
        }
        Ok(())
    }

    pub fn array_len(&self) -> Result<usize> {
        Ok(self.as_array()?.len())
    }

    pub fn push(&self, value: Value) -> Result<()> {
        let old = self.as_array()?;
        let mut new = old.clone();
        new.push(value);
        self.apply_array_diff(&old, &new)
    }

    pub fn pop(&self) -> Result<()> {
        let old = self.as_array()?;
        let mut new = old.clone();
        new.pop();
        self.apply_array_diff(&old, &new)
    }

    pub fn remove_first(&self) -> Result<()> {
        let old = self.as_array()?;
        let mut new = old.clone();
        if !new.is_empty() {
            new.remove(0);
        }
        self.apply_array_diff(&old, &new)
    }

    pub fn reverse(&self) -> Result<()> {
        let old = self.as_array()?;
        let mut new = old.clone();
        new.reverse();
        self.apply_array_diff(&old, &new)
    }

    pub fn sort_by<F>(&self, mut compare: F) -> Result<()>
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        let old = self.as_array()?;
        let mut new = old.clone();
        new.sort_by(|a, b| compare(a, b));
        self.apply_array_diff(&old, &new)
    }

    pub fn splice(&self, index: usize, remove_count: usize, inserts: Vec<Value>) -> Result<()> {
        let old = self.as_array()?;
        let mut new = old.clone();
        let start = index.min(new.len());
        let end = (index + remove_count).min(new.len());
        new.splice(start..end, inserts);
        self.apply_array_diff(&old, &new)
    }

    pub fn set_index(&self, index: usize, value: Value) -> Result<()> {
        self.set(&index.to_string(), value)
    }
}

#[cfg(test)]
impl Field {
    pub(crate) fn to_owned_value(&self) -> Value {
        match self {
            Field::Value(v) => v.clone(),
            Field::View(v) => v.to_value(),
        }
    }
}

/// A compile-time-resolved stand-in for a duck-typed `isManaged` check:
/// implemented for the two types that can ever need one, so membership
/// is a trait dispatch rather than a runtime capability probe.
pub trait ManagedLike {
    fn is_managed(&self) -> bool;
}

impl ManagedLike for Value {
    fn is_managed(&self) -> bool {
        false
    }
}

impl ManagedLike for DocView {
    fn is_managed(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;
