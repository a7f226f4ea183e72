//! versadoc is a versioned, observable, JSON-shaped document store.
//!
//! It wraps a plain [`serde_json::Value`] tree and transparently captures
//! every mutation made through its [`DocView`] cursor as an ordered,
//! append-only redo log, while emitting change events that can drive
//! read-only replicas (also [`DocView`]s, backed by the `replica` module)
//! to stay in sync with a primary.
//!
//! The three collaborators:
//! - [`document::create`] wraps a plain value (or re-attaches a
//!   previously detached-with-history value) as a managed [`DocView`].
//! - [`DocView`] is the interception layer: every `get`/`set`/`delete`
//!   and array mutation through it is captured as one or more
//!   [`entry::LogEntry`] appends and one [`emitter::ChangeEvent`] per
//!   top-level call.
//! - [`replica::create_from_snapshot`] and [`replica::apply`] build and
//!   advance read-only mirrors driven entirely by change events.
//!
//! A document's history is append-only and replayable: `restore_version`
//! reconstructs any prior state, and `detach_preserve_version_data`
//! produces a plain value that `document::create` can re-attach losslessly.

pub mod document;
mod emitter;
mod entry;
mod error;
mod log;
pub mod replica;
mod value;
mod view;

pub use crate::document::create;
pub use crate::emitter::{ChangeEvent, Emitter};
pub use crate::entry::{LogEntry, Op};
pub use crate::error::{Error, Result};
pub use crate::value::{is_assignable, is_manageable, VERSIONING_KEY};
pub use crate::view::{DocView, Field, ManagedLike};
