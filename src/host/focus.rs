//! Tab-order focus over a component's widget tree.

use crate::render::{WidgetId, WidgetTree};

/// Ordered list of focusable widgets plus the focused position.
///
/// Rebuilt from the widget tree after every tick. Widgets matched across
/// renders keep their id, so focus survives recomposition.
#[derive(Debug, Default)]
pub struct FocusChain {
    /// Focusable widgets in document order.
    widgets: Vec<WidgetId>,
    current: Option<usize>,
}

impl FocusChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from `tree`, keeping the focused widget if it still exists.
    /// With nothing focused yet, the first focusable widget takes focus.
    pub fn rebuild(&mut self, tree: &WidgetTree) {
        let old = self.current_widget();
        self.widgets = tree.focusable();
        self.current = match old {
            Some(id) => self.widgets.iter().position(|&w| w == id),
            None => None,
        };
        if self.current.is_none() && !self.widgets.is_empty() {
            self.current = Some(0);
        }
    }

    /// The focused widget, if any.
    pub fn current_widget(&self) -> Option<WidgetId> {
        self.current.and_then(|idx| self.widgets.get(idx).copied())
    }

    /// Move focus forward, wrapping around.
    pub fn focus_next(&mut self) -> Option<WidgetId> {
        if self.widgets.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(idx) => (idx + 1) % self.widgets.len(),
            None => 0,
        };
        self.current = Some(next);
        self.widgets.get(next).copied()
    }

    /// Move focus backward, wrapping around.
    pub fn focus_previous(&mut self) -> Option<WidgetId> {
        if self.widgets.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.widgets.len() - 1,
            Some(idx) => idx - 1,
        };
        self.current = Some(prev);
        self.widgets.get(prev).copied()
    }

    /// Focus a specific widget. Returns `false` if it isn't in the chain.
    pub fn focus(&mut self, id: WidgetId) -> bool {
        match self.widgets.iter().position(|&w| w == id) {
            Some(pos) => {
                self.current = Some(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.widgets.clear();
        self.current = None;
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
