//! Component lifecycle: mount, render, unmount.
//!
//! The `LifecycleTracker` records which components are currently mounted and
//! accumulates lifecycle events that the host can drain after each tick.

use std::collections::HashSet;

use crate::reactive::ComponentId;

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// Events that occur during a component's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A component was mounted and its state cells registered.
    Mount { component: ComponentId },
    /// A component's `view()` ran. `ok` is false when it failed.
    Render { component: ComponentId, ok: bool },
    /// A component was released along with its state cells.
    Unmount { component: ComponentId },
}

// ---------------------------------------------------------------------------
// LifecycleTracker
// ---------------------------------------------------------------------------

/// Tracks mounted components and queues their lifecycle events.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    mounted: HashSet<ComponentId>,
    pending: Vec<LifecycleEvent>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mount. Mounting twice is a no-op.
    pub fn on_mount(&mut self, id: ComponentId) {
        if self.mounted.insert(id) {
            self.pending.push(LifecycleEvent::Mount { component: id });
        }
    }

    /// Record an unmount. Unmounting an unknown component is a no-op.
    pub fn on_unmount(&mut self, id: ComponentId) {
        if self.mounted.remove(&id) {
            self.pending.push(LifecycleEvent::Unmount { component: id });
        }
    }

    /// Record a render of a mounted component.
    pub fn on_render(&mut self, id: ComponentId, ok: bool) {
        if self.mounted.contains(&id) {
            self.pending.push(LifecycleEvent::Render { component: id, ok });
        }
    }

    pub fn is_mounted(&self, id: ComponentId) -> bool {
        self.mounted.contains(&id)
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    /// Drain pending events in order of occurrence.
    pub fn pending_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
