//! Reactive state: component slots, state cells, cross-thread writes.
//!
//! - [`State`] — typed handle to one observable cell.
//! - [`runtime`] — the thread-local arena and dirty set behind the handles.
//! - [`Mailbox`] / [`Remote`] — marshal writes from background threads.

pub mod cell;
pub mod remote;
pub mod runtime;

pub use cell::State;
pub use remote::{Mailbox, MailboxClosed, Remote};
pub use runtime::{CellRef, ComponentId, RenderStatus, StateAccessError, WriteOutcome};
