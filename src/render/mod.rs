//! Rendering: patch consumers.
//!
//! - [`Renderer`] — the seam patches are handed across after every flush.
//! - [`RetainedRenderer`] — keeps one [`WidgetTree`] per component.
//! - [`RecordingRenderer`] — logs patches, for tests and tracing.
//! - [`paint`] / [`driver`] — text painting and the crossterm backend used by
//!   the terminal host.

pub mod driver;
pub mod paint;
pub mod retained;

use std::collections::HashMap;

pub use driver::Driver;
pub use paint::{paint, Line, Span};
pub use retained::{LocalState, Widget, WidgetId, WidgetTree};

use crate::reactive::ComponentId;
use crate::reconcile::{ApplyError, Patch};

/// Consumes the patch stream.
pub trait Renderer {
    /// Apply one component's patch.
    fn apply(&mut self, component: ComponentId, patch: &Patch) -> Result<(), ApplyError>;

    /// The component was unmounted; drop anything kept for it.
    fn release(&mut self, _component: ComponentId) {}
}

// ---------------------------------------------------------------------------
// RetainedRenderer
// ---------------------------------------------------------------------------

/// Materializes every component's patches into its own widget tree.
#[derive(Debug, Default)]
pub struct RetainedRenderer {
    trees: HashMap<ComponentId, WidgetTree>,
}

impl RetainedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self, component: ComponentId) -> Option<&WidgetTree> {
        self.trees.get(&component)
    }

    pub fn tree_mut(&mut self, component: ComponentId) -> Option<&mut WidgetTree> {
        self.trees.get_mut(&component)
    }
}

impl Renderer for RetainedRenderer {
    fn apply(&mut self, component: ComponentId, patch: &Patch) -> Result<(), ApplyError> {
        self.trees.entry(component).or_default().apply(patch)
    }

    fn release(&mut self, component: ComponentId) {
        self.trees.remove(&component);
    }
}

// ---------------------------------------------------------------------------
// RecordingRenderer
// ---------------------------------------------------------------------------

/// Records every patch it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<(ComponentId, Patch)>,
    released: Vec<ComponentId>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[(ComponentId, Patch)] {
        &self.frames
    }

    pub fn released(&self) -> &[ComponentId] {
        &self.released
    }

    /// Drain recorded frames.
    pub fn take(&mut self) -> Vec<(ComponentId, Patch)> {
        std::mem::take(&mut self.frames)
    }
}

impl Renderer for RecordingRenderer {
    fn apply(&mut self, component: ComponentId, patch: &Patch) -> Result<(), ApplyError> {
        self.frames.push((component, patch.clone()));
        Ok(())
    }

    fn release(&mut self, component: ComponentId) {
        self.released.push(component);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{diff, removal};
    use crate::view::chained::{column, text};
    use slotmap::SlotMap;

    fn component() -> ComponentId {
        let mut ids: SlotMap<ComponentId, ()> = SlotMap::with_key();
        ids.insert(())
    }

    #[test]
    fn retained_keeps_tree_per_component() {
        let id = component();
        let mut renderer = RetainedRenderer::new();
        renderer.apply(id, &diff(None, &column([text("a")]))).unwrap();
        assert_eq!(renderer.tree(id).map(WidgetTree::len), Some(2));
        renderer.apply(id, &removal()).unwrap();
        assert_eq!(renderer.tree(id).map(WidgetTree::is_empty), Some(true));
        renderer.release(id);
        assert!(renderer.tree(id).is_none());
    }

    #[test]
    fn recording_logs_in_order() {
        let id = component();
        let mut renderer = RecordingRenderer::new();
        let first = diff(None, &text("a"));
        renderer.apply(id, &first).unwrap();
        renderer.apply(id, &removal()).unwrap();
        renderer.release(id);
        assert_eq!(renderer.frames().len(), 2);
        assert_eq!(renderer.frames()[0], (id, first));
        assert_eq!(renderer.released(), &[id]);
        assert_eq!(renderer.take().len(), 2);
        assert!(renderer.frames().is_empty());
    }
}
