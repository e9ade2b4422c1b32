//! Click handlers with an explicit capture record.
//!
//! A [`Handler`] pairs the action closure with a [`Capture`]: which component's
//! state it touches and, when known, which cell indices. Invoking checks the
//! captured component is still alive and still owns every captured cell. Writes
//! made while the owner is rendering are buffered by the runtime until the
//! render returns.

use std::fmt;
use std::rc::Rc;

use crate::reactive::runtime::{self, ComponentId, RenderStatus, StateAccessError};

/// Outcome of running a handler.
pub type HandlerResult = Result<(), StateAccessError>;

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

/// What a handler closes over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capture {
    /// Component whose state the handler mutates. `None` when built outside
    /// any render and without a state handle.
    pub component: Option<ComponentId>,
    /// Referenced cell indices within `component`, in declaration order.
    pub cells: Vec<usize>,
}

impl Capture {
    pub fn new(component: ComponentId) -> Self {
        Self {
            component: Some(component),
            cells: Vec::new(),
        }
    }

    /// Record a referenced cell (builder). Keeps indices sorted and unique.
    pub fn with_cell(mut self, index: usize) -> Self {
        if let Err(pos) = self.cells.binary_search(&index) {
            self.cells.insert(pos, index);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// A zero-argument click handler.
#[derive(Clone)]
pub struct Handler {
    capture: Capture,
    action: Rc<dyn Fn() -> HandlerResult>,
}

impl Handler {
    /// Wrap a closure. The capture records the component currently rendering,
    /// which is the component whose `view()` built this handler.
    pub fn new(action: impl Fn() -> HandlerResult + 'static) -> Self {
        let capture = Capture {
            component: runtime::current_render(),
            cells: Vec::new(),
        };
        Self::with_capture(capture, action)
    }

    /// Wrap a closure with an explicit capture record.
    pub fn with_capture(capture: Capture, action: impl Fn() -> HandlerResult + 'static) -> Self {
        Self {
            capture,
            action: Rc::new(action),
        }
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    /// Run the action synchronously.
    ///
    /// Fails without running the action if the captured component has been
    /// destroyed ([`StateAccessError::ComponentReleased`]) or a captured cell
    /// index is past its declared cells ([`StateAccessError::CellOutOfRange`]).
    pub fn invoke(&self) -> HandlerResult {
        if let Some(component) = self.capture.component {
            let count = runtime::cell_count(component)
                .ok_or(StateAccessError::ComponentReleased { component })?;
            if let Some(&index) = self.capture.cells.iter().find(|&&index| index >= count) {
                return Err(StateAccessError::CellOutOfRange { component, index });
            }
            if runtime::status(component) == Some(RenderStatus::Rendering) {
                tracing::trace!(?component, cells = ?self.capture.cells, "handler invoked mid-render; writes deferred");
            }
        }
        (self.action)()
    }
}

impl<F> From<F> for Handler
where
    F: Fn() -> HandlerResult + 'static,
{
    fn from(action: F) -> Self {
        Handler::new(action)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::runtime::{register_component, release_component, reset_runtime};
    use std::cell::Cell;

    #[test]
    fn capture_cells_sorted_unique() {
        reset_runtime();
        let id = register_component("Test");
        let capture = Capture::new(id).with_cell(2).with_cell(0).with_cell(2);
        assert_eq!(capture.cells, vec![0, 2]);
    }

    #[test]
    fn handler_outside_render_has_no_component() {
        reset_runtime();
        let handler = Handler::new(|| Ok(()));
        assert_eq!(handler.capture().component, None);
        assert!(handler.invoke().is_ok());
    }

    #[test]
    fn handler_for_released_component_is_rejected() {
        reset_runtime();
        let id = register_component("Gone");
        let ran = Rc::new(Cell::new(false));
        let ran_c = ran.clone();
        let handler = Handler::with_capture(Capture::new(id), move || {
            ran_c.set(true);
            Ok(())
        });
        release_component(id);
        assert_eq!(
            handler.invoke(),
            Err(StateAccessError::ComponentReleased { component: id })
        );
        assert!(!ran.get());
    }

    #[test]
    fn handler_with_undeclared_cell_is_rejected() {
        reset_runtime();
        let id = register_component("Short");
        runtime::add_cell(id, 0u8).unwrap();
        let ran = Rc::new(Cell::new(false));
        let ran_c = ran.clone();
        let handler = Handler::with_capture(Capture::new(id).with_cell(0).with_cell(3), move || {
            ran_c.set(true);
            Ok(())
        });
        assert_eq!(
            handler.invoke(),
            Err(StateAccessError::CellOutOfRange { component: id, index: 3 })
        );
        assert!(!ran.get());

        let ok = Handler::with_capture(Capture::new(id).with_cell(0), || Ok(()));
        assert!(ok.invoke().is_ok());
    }

    #[test]
    fn closure_converts_into_handler() {
        reset_runtime();
        let hits = Rc::new(Cell::new(0));
        let hits_c = hits.clone();
        let handler: Handler = (move || -> HandlerResult {
            hits_c.set(hits_c.get() + 1);
            Ok(())
        })
        .into();
        handler.invoke().unwrap();
        handler.clone().invoke().unwrap();
        assert_eq!(hits.get(), 2);
    }
}
