//! Construction scope: where a component declares its state cells.

use crate::reactive::runtime;
use crate::reactive::{ComponentId, State};

/// Handed to a component's constructor. Each [`state`](Scope::state) call
/// registers one cell; indices follow declaration order.
#[derive(Debug)]
pub struct Scope {
    id: ComponentId,
}

impl Scope {
    pub(crate) fn new(id: ComponentId) -> Self {
        Self { id }
    }

    /// The id the component being built will be mounted under.
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Declare a new state cell holding `initial`.
    pub fn state<T: 'static>(&mut self, initial: T) -> State<T> {
        let index = match runtime::add_cell(self.id, initial) {
            Ok(index) => index,
            Err(err) => {
                // Only reachable if the slot was released mid-construction;
                // the handle then fails on every access.
                tracing::error!(%err, "state cell declared on a released component");
                usize::MAX
            }
        };
        State::from_cell(runtime::CellRef { component: self.id, index })
    }

    /// Number of cells declared so far.
    pub fn cell_count(&self) -> usize {
        runtime::cell_count(self.id).unwrap_or(0)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
