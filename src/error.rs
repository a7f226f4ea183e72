use std::fmt;

/// Error conditions raised by this crate.
///
/// Every variant is a local, non-retryable failure: the tree and log are
/// left exactly as they were before the call that returned it, except for
/// [`Error::OutOfSync`] where the replica is explicitly documented to remain
/// at its prior LSN.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// `create` was given a value that is not a manageable root (not an
    /// object, or an object nested value failed the assignability check).
    NonManageable,
    /// A value failed the assignability check (recursion too deep).
    NonAssignableValue,
    /// A write used a non-string key. Unreachable via the public API today
    /// (all containers are keyed or indexed by `String`) but kept for
    /// fidelity with the external interface.
    InvalidKey,
    /// Reserved for an identity/graph-shape violation where a value
    /// already belongs to another managed document. Structurally
    /// unreachable in this crate: see DESIGN.md.
    CrossAttachment,
    /// A view's path no longer resolves in the root because an ancestor
    /// was deleted out from under it.
    OrphanedView,
    /// A write targeted a replica, the reserved `__versioning__` key, or
    /// any path beneath it.
    ReadOnlyViolation,
    /// `restore_version` was given an index `>= version_count()`.
    InvalidVersionId,
    /// `Replica::create_from_snapshot` was given a value that is not
    /// shaped like a snapshot (`__versioning__.lsn` missing or non-numeric).
    InvalidSnapshot,
    /// A re-attach candidate's `__versioning__.log` failed structural
    /// validation or its replay does not equal the carried data.
    InvalidVersioningData,
    /// A log entry could not be applied: its path does not resolve to a
    /// container at the point of application.
    MalformedEntry,
    /// A replica received a change event out of sequence.
    OutOfSync { expected: u64, got: u64 },
    /// An operation that requires a managed document view was given
    /// something else.
    NotManaged,
    /// An operation that requires a replica was given something else.
    NotReplica,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NonManageable => write!(f, "value is not a manageable document root"),
            Error::NonAssignableValue => write!(f, "value is not assignable"),
            Error::InvalidKey => write!(f, "key is not a valid string key"),
            Error::CrossAttachment => write!(f, "value is already attached to a managed document"),
            Error::OrphanedView => write!(f, "view's path no longer resolves in the document"),
            Error::ReadOnlyViolation => write!(f, "write rejected by a read-only view"),
            Error::InvalidVersionId => write!(f, "version id is out of range"),
            Error::InvalidSnapshot => write!(f, "value is not a valid replica snapshot"),
            Error::InvalidVersioningData => {
                write!(f, "__versioning__.log failed structural validation or replay mismatch")
            }
            Error::MalformedEntry => write!(f, "log entry path does not resolve to a container"),
            Error::OutOfSync { expected, got } => {
                write!(f, "replica out of sync: expected lsn {}, got {}", expected, got)
            }
            Error::NotManaged => write!(f, "value is not a managed document view"),
            Error::NotReplica => write!(f, "value is not a replica"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
