//! A single-topic, synchronous, process-local publish/subscribe
//! primitive: handlers registered on the `change` topic are invoked, in
//! registration order, once per committed mutation.

use std::cell::RefCell;

use tracing::trace;

use crate::entry::LogEntry;
use crate::error::Result;

/// A single published mutation: the LSN it was assigned, and the entry
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub lsn: u64,
    pub entry: LogEntry,
}

type Handler = Box<dyn FnMut(&ChangeEvent) -> Result<()>>;

/// Registration-order synchronous dispatcher for [`ChangeEvent`]s.
///
/// `emit` invokes every currently-registered handler in registration
/// order. A handler returning `Err` aborts dispatch to the remaining
/// handlers and propagates to `emit`'s caller — the write site — without
/// rolling back the log entry that was already appended.
pub struct Emitter {
    handlers: RefCell<Vec<Handler>>,
}

impl Emitter {
    pub fn new() -> Emitter {
        Emitter {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Register a handler on the single `change` topic.
    pub fn on_change<F>(&self, handler: F)
    where
        F: FnMut(&ChangeEvent) -> Result<()> + 'static,
    {
        self.handlers.borrow_mut().push(Box::new(handler));
    }

    pub(crate) fn emit(&self, event: &ChangeEvent) -> Result<()> {
        trace!(lsn = event.lsn, "emitting change event");
        for handler in self.handlers.borrow_mut().iter_mut() {
            handler(event)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl Default for Emitter {
    fn default() -> Emitter {
        Emitter::new()
    }
}

#[cfg(test)]
#[path = "emitter_test.rs"]
mod emitter_test;
