//! Marshalling state writes from other threads onto the event-loop thread.
//!
//! The runtime is thread-local, so a background task (a network callback, a
//! timer thread) cannot call [`State::set`] directly. Instead it holds a
//! [`Remote<T>`], which sends the write through an unbounded channel. The app
//! drains its [`Mailbox`] at the start of every tick, applying the writes on
//! the loop thread before any handler or flush runs.

use std::fmt;
use std::marker::PhantomData;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::cell::State;
use super::runtime::{self, CellRef, StateAccessError, WriteOutcome};

type RemoteWrite = Box<dyn FnOnce() -> Result<WriteOutcome, StateAccessError> + Send>;

/// The event loop side of the cross-thread channel has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event loop mailbox is closed")]
pub struct MailboxClosed;

// ---------------------------------------------------------------------------
// Mailbox
// ---------------------------------------------------------------------------

/// Receiving end, owned by the app on the event-loop thread.
pub struct Mailbox {
    tx: UnboundedSender<RemoteWrite>,
    rx: UnboundedReceiver<RemoteWrite>,
}

impl Mailbox {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Create a `Send` write handle for `state`.
    pub fn remote<T: PartialEq + Send + 'static>(&self, state: State<T>) -> Remote<T> {
        Remote {
            cell: state.cell(),
            tx: self.tx.clone(),
            _marker: PhantomData,
        }
    }

    /// Apply every queued write in arrival order.
    pub fn drain(&mut self) -> Vec<Result<WriteOutcome, StateAccessError>> {
        let mut outcomes = Vec::new();
        while let Ok(write) = self.rx.try_recv() {
            outcomes.push(write());
        }
        if !outcomes.is_empty() {
            tracing::trace!(count = outcomes.len(), "applied remote writes");
        }
        outcomes
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Remote
// ---------------------------------------------------------------------------

/// Thread-safe write handle for one state cell.
pub struct Remote<T> {
    cell: CellRef,
    tx: UnboundedSender<RemoteWrite>,
    _marker: PhantomData<fn(T)>,
}

impl<T> Clone for Remote<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell,
            tx: self.tx.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Remote<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Remote").field("cell", &self.cell).finish()
    }
}

impl<T: PartialEq + Send + 'static> Remote<T> {
    /// Queue `value` to be written on the event-loop thread.
    pub fn set(&self, value: T) -> Result<(), MailboxClosed> {
        let cell = self.cell;
        self.tx
            .send(Box::new(move || runtime::write(cell, value)))
            .map_err(|_| MailboxClosed)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
