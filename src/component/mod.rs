//! Components: private state plus a pure state-to-tree `view()`.
//!
//! - [`Component`] — the trait every UI unit implements.
//! - [`Scope`] — declares state cells while a component is constructed.
//! - [`Registry`] — owns mounted components and their last rendered trees.
//! - [`LifecycleTracker`] — mount / render / unmount event log.

pub mod lifecycle;
pub mod registry;
pub mod scope;

pub use lifecycle::{LifecycleEvent, LifecycleTracker};
pub use registry::Registry;
pub use scope::Scope;

use crate::reactive::StateAccessError;
use crate::view::ViewNode;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A `view()` call that failed to produce a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A state cell read failed during `view()`.
    #[error(transparent)]
    State(#[from] StateAccessError),
    /// `view()` panicked; the payload message is kept.
    #[error("view panicked: {message}")]
    Panicked { message: String },
    /// The component reported its own failure.
    #[error("{0}")]
    Invalid(String),
}

/// What `view()` returns.
pub type ViewResult = Result<ViewNode, RenderError>;

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A unit of UI with private state and a pure `view()`.
///
/// State cells are declared in the constructor through [`Scope::state`];
/// `view()` reads them and returns a fresh tree. It must not write state:
/// mutation belongs in click handlers. A write that happens anyway is
/// buffered until the render ends.
///
/// ```ignore
/// struct Counter { count: State<i64> }
///
/// impl Component for Counter {
///     fn name(&self) -> &str { "Counter" }
///
///     fn view(&self) -> ViewResult {
///         Ok(column([
///             text(format!("Count: {}", self.count.get()?)),
///             button("+").on_click(self.count.updater(|n| n + 1)),
///         ]))
///     }
/// }
/// ```
pub trait Component: 'static {
    /// Display name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Build the current tree. Called at most once per component per flush.
    fn view(&self) -> ViewResult;
}
