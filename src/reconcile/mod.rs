//! Reconciliation: diffing two view trees into a [`Patch`].
//!
//! - [`diff`] / [`diff_report`] — compute the edit script between renders.
//! - [`Patch`] — ordered Insert / Remove / Update operations.
//! - [`ReconcileError`] — in-place changes resolved by subtree replacement.

pub mod diff;
pub mod patch;

pub use diff::{diff, diff_props, diff_report, removal, Diff, ReconcileError};
pub use patch::{ApplyError, Patch, PatchOp, PropChange};

// ===========================================================================
// Tests
// ===========================================================================
