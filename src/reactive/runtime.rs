//! Thread-local reactive runtime: component slots, state cells, dirty set.
//!
//! Every mounted component owns one slot in a slotmap arena. A slot holds the
//! component's state cells in declaration order, its render status, and any
//! writes that arrived while the component was mid-render. The dirty set is the
//! scheduler's queue of components to re-render on the next flush.
//!
//! The runtime is single-threaded by construction (`thread_local!`). Writes from
//! other threads go through [`Mailbox`](super::remote::Mailbox).

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifies a mounted component. Stable across re-renders of the same
    /// instance; never reused for a different instance while the runtime lives.
    pub struct ComponentId;
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A state cell was touched without a live owning component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateAccessError {
    #[error("component {component:?} has been released")]
    ComponentReleased { component: ComponentId },
    #[error("component {component:?} has no state cell at index {index}")]
    CellOutOfRange { component: ComponentId, index: usize },
    #[error("state cell {index} of component {component:?} holds a different type")]
    TypeMismatch { component: ComponentId, index: usize },
}

impl StateAccessError {
    /// The component the failed access was aimed at.
    pub fn component(&self) -> ComponentId {
        match self {
            StateAccessError::ComponentReleased { component }
            | StateAccessError::CellOutOfRange { component, .. }
            | StateAccessError::TypeMismatch { component, .. } => *component,
        }
    }
}

// ---------------------------------------------------------------------------
// Public value types
// ---------------------------------------------------------------------------

/// Address of one state cell: owning component plus declaration index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub component: ComponentId,
    pub index: usize,
}

/// Per-component render state machine.
///
/// `Clean -> Dirty` on a changing write, `Dirty -> Rendering` when the
/// scheduler starts `view()`, `Rendering -> Clean` when it returns (or fails).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderStatus {
    Clean,
    Dirty,
    Rendering,
}

/// What a write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOutcome {
    /// The new value equals the old one. Nothing was scheduled.
    Unchanged,
    /// The value changed and the owner (plus subscribers) are dirty.
    Changed,
    /// The owner is mid-render; the write is buffered until the render ends.
    Deferred,
}

// ---------------------------------------------------------------------------
// Runtime internals
// ---------------------------------------------------------------------------

struct CellSlot {
    value: Box<dyn Any>,
    /// Components whose last `view()` read this cell.
    subscribers: HashSet<ComponentId>,
}

/// A buffered write. Returns `Some(changed)` or `None` on type mismatch.
type DeferredWrite = Box<dyn FnOnce(&mut Box<dyn Any>) -> Option<bool>>;

struct ComponentSlot {
    name: String,
    /// Mount sequence number, used for a stable flush order.
    seq: u64,
    cells: Vec<CellSlot>,
    status: RenderStatus,
    deferred: Vec<(usize, DeferredWrite)>,
}

struct Runtime {
    components: SlotMap<ComponentId, ComponentSlot>,
    dirty: HashSet<ComponentId>,
    /// The component whose `view()` is currently executing.
    rendering: Option<ComponentId>,
    next_seq: u64,
}

impl Runtime {
    fn new() -> Self {
        Self {
            components: SlotMap::with_key(),
            dirty: HashSet::new(),
            rendering: None,
            next_seq: 0,
        }
    }

    fn cell_mut(&mut self, cell: CellRef) -> Result<&mut CellSlot, StateAccessError> {
        let slot = self
            .components
            .get_mut(cell.component)
            .ok_or(StateAccessError::ComponentReleased { component: cell.component })?;
        slot.cells.get_mut(cell.index).ok_or(StateAccessError::CellOutOfRange {
            component: cell.component,
            index: cell.index,
        })
    }

    /// Put `id` into the dirty set. A component that is mid-render keeps its
    /// `Rendering` status; `end_render` turns it into `Dirty`.
    fn schedule(&mut self, id: ComponentId) {
        if let Some(slot) = self.components.get_mut(id) {
            self.dirty.insert(id);
            if slot.status != RenderStatus::Rendering {
                slot.status = RenderStatus::Dirty;
            }
        }
    }

    /// Schedule the owner of `cell` and every live subscriber.
    fn notify(&mut self, cell: CellRef) {
        let subscribers: Vec<ComponentId> = match self.cell_mut(cell) {
            Ok(slot) => slot.subscribers.iter().copied().collect(),
            Err(_) => Vec::new(),
        };
        self.schedule(cell.component);
        let mut gone = Vec::new();
        for sub in subscribers {
            if self.components.contains_key(sub) {
                self.schedule(sub);
            } else {
                gone.push(sub);
            }
        }
        if !gone.is_empty() {
            if let Ok(slot) = self.cell_mut(cell) {
                for sub in gone {
                    slot.subscribers.remove(&sub);
                }
            }
        }
    }

    fn owner_is_rendering(&self, id: ComponentId) -> bool {
        self.components
            .get(id)
            .is_some_and(|slot| slot.status == RenderStatus::Rendering)
    }
}

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

// ---------------------------------------------------------------------------
// Component slots
// ---------------------------------------------------------------------------

/// Allocate a slot for a new component. It starts `Dirty` so the next flush
/// produces its first tree.
pub(crate) fn register_component(name: &str) -> ComponentId {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let seq = rt.next_seq;
        rt.next_seq += 1;
        let id = rt.components.insert(ComponentSlot {
            name: name.to_owned(),
            seq,
            cells: Vec::new(),
            status: RenderStatus::Dirty,
            deferred: Vec::new(),
        });
        rt.dirty.insert(id);
        tracing::debug!(component = ?id, name, "component registered");
        id
    })
}

/// Rename a slot once the component value exists (the name is only known
/// after construction).
pub(crate) fn set_component_name(id: ComponentId, name: &str) {
    RUNTIME.with(|rt| {
        if let Some(slot) = rt.borrow_mut().components.get_mut(id) {
            slot.name = name.to_owned();
        }
    });
}

/// Drop a component slot and all of its cells. Returns `false` if it was
/// already gone.
pub(crate) fn release_component(id: ComponentId) -> bool {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        rt.dirty.remove(&id);
        match rt.components.remove(id) {
            Some(slot) => {
                tracing::debug!(component = ?id, name = %slot.name, cells = slot.cells.len(), "component released");
                true
            }
            None => false,
        }
    })
}

/// Append a state cell to a component's slot and return its index.
pub(crate) fn add_cell<T: 'static>(id: ComponentId, initial: T) -> Result<usize, StateAccessError> {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let slot = rt
            .components
            .get_mut(id)
            .ok_or(StateAccessError::ComponentReleased { component: id })?;
        slot.cells.push(CellSlot {
            value: Box::new(initial),
            subscribers: HashSet::new(),
        });
        Ok(slot.cells.len() - 1)
    })
}

/// Whether a component slot is still live.
pub fn is_alive(id: ComponentId) -> bool {
    RUNTIME.with(|rt| rt.borrow().components.contains_key(id))
}

/// The render status of a live component.
pub fn status(id: ComponentId) -> Option<RenderStatus> {
    RUNTIME.with(|rt| rt.borrow().components.get(id).map(|slot| slot.status))
}

/// Number of state cells a live component has declared.
pub fn cell_count(id: ComponentId) -> Option<usize> {
    RUNTIME.with(|rt| rt.borrow().components.get(id).map(|slot| slot.cells.len()))
}

/// The component whose `view()` is running right now, if any.
pub fn current_render() -> Option<ComponentId> {
    RUNTIME.with(|rt| rt.borrow().rendering)
}

// ---------------------------------------------------------------------------
// Cell access
// ---------------------------------------------------------------------------

/// Read a cell by reference. When `track` is set and a component is rendering,
/// that component subscribes to the cell.
///
/// `f` runs while the runtime is borrowed: it may read other cells but must
/// not write.
pub(crate) fn read<T: 'static, R>(
    cell: CellRef,
    track: bool,
    f: impl FnOnce(&T) -> R,
) -> Result<R, StateAccessError> {
    RUNTIME.with(|rt| {
        if track {
            let mut rt_mut = rt.borrow_mut();
            if let Some(reader) = rt_mut.rendering {
                rt_mut.cell_mut(cell)?.subscribers.insert(reader);
            }
        }
        let rt_ref = rt.borrow();
        let slot = rt_ref
            .components
            .get(cell.component)
            .ok_or(StateAccessError::ComponentReleased { component: cell.component })?;
        let value = slot.cells.get(cell.index).ok_or(StateAccessError::CellOutOfRange {
            component: cell.component,
            index: cell.index,
        })?;
        let typed = value.value.downcast_ref::<T>().ok_or(StateAccessError::TypeMismatch {
            component: cell.component,
            index: cell.index,
        })?;
        Ok(f(typed))
    })
}

/// Replace a cell's value. Equal values are a no-op.
pub(crate) fn write<T: PartialEq + 'static>(
    cell: CellRef,
    value: T,
) -> Result<WriteOutcome, StateAccessError> {
    modify::<T>(cell, move |slot| {
        if *slot == value {
            false
        } else {
            *slot = value;
            true
        }
    })
}

/// Mutate a cell in place. `f` reports whether it changed anything.
pub(crate) fn modify<T: 'static>(
    cell: CellRef,
    f: impl FnOnce(&mut T) -> bool + 'static,
) -> Result<WriteOutcome, StateAccessError> {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        // Validate the address first so deferred writes fail eagerly too.
        let slot = rt.cell_mut(cell)?;
        if !slot.value.is::<T>() {
            return Err(StateAccessError::TypeMismatch {
                component: cell.component,
                index: cell.index,
            });
        }

        if rt.owner_is_rendering(cell.component) {
            tracing::trace!(component = ?cell.component, index = cell.index, "write deferred to next tick");
            let deferred: DeferredWrite = Box::new(move |value: &mut Box<dyn Any>| {
                value.downcast_mut::<T>().map(f)
            });
            if let Some(owner) = rt.components.get_mut(cell.component) {
                owner.deferred.push((cell.index, deferred));
            }
            return Ok(WriteOutcome::Deferred);
        }

        let slot = rt.cell_mut(cell)?;
        let changed = match slot.value.downcast_mut::<T>() {
            Some(value) => f(value),
            None => false,
        };
        if !changed {
            return Ok(WriteOutcome::Unchanged);
        }
        tracing::trace!(component = ?cell.component, index = cell.index, "state cell changed");
        rt.notify(cell);
        Ok(WriteOutcome::Changed)
    })
}

// ---------------------------------------------------------------------------
// Render bracketing
// ---------------------------------------------------------------------------

/// Enter `Rendering` for `id`. The component leaves the dirty set: whatever it
/// sees now is what this render reflects.
pub(crate) fn begin_render(id: ComponentId) -> Result<(), StateAccessError> {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let slot = rt
            .components
            .get_mut(id)
            .ok_or(StateAccessError::ComponentReleased { component: id })?;
        slot.status = RenderStatus::Rendering;
        rt.dirty.remove(&id);
        rt.rendering = Some(id);
        Ok(())
    })
}

/// Leave `Rendering` for `id` and apply buffered writes. Returns how many of
/// them changed state; if any did, the component is dirty for the next flush.
pub(crate) fn end_render(id: ComponentId) -> usize {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        if rt.rendering == Some(id) {
            rt.rendering = None;
        }
        let Some(slot) = rt.components.get_mut(id) else {
            return 0;
        };
        slot.status = RenderStatus::Clean;
        let deferred = std::mem::take(&mut slot.deferred);

        let mut changed_cells = Vec::new();
        for (index, apply) in deferred {
            let Some(cell) = slot.cells.get_mut(index) else {
                continue;
            };
            if apply(&mut cell.value) == Some(true) {
                changed_cells.push(index);
            }
        }
        for index in &changed_cells {
            rt.notify(CellRef { component: id, index: *index });
        }
        if rt.dirty.contains(&id) {
            if let Some(slot) = rt.components.get_mut(id) {
                slot.status = RenderStatus::Dirty;
            }
        }
        changed_cells.len()
    })
}

// ---------------------------------------------------------------------------
// Dirty set
// ---------------------------------------------------------------------------

/// Mark a component dirty without a state change (forced re-render).
pub fn mark_dirty(id: ComponentId) {
    RUNTIME.with(|rt| rt.borrow_mut().schedule(id));
}

/// Snapshot and clear the dirty set, ordered by mount sequence.
pub(crate) fn take_dirty() -> Vec<ComponentId> {
    RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let dirty = std::mem::take(&mut rt.dirty);
        let mut ordered: Vec<(u64, ComponentId)> = dirty
            .into_iter()
            .filter_map(|id| rt.components.get(id).map(|slot| (slot.seq, id)))
            .collect();
        ordered.sort_unstable_by_key(|(seq, _)| *seq);
        ordered.into_iter().map(|(_, id)| id).collect()
    })
}

/// Whether `id` is waiting for the next flush.
pub fn is_dirty(id: ComponentId) -> bool {
    RUNTIME.with(|rt| rt.borrow().dirty.contains(&id))
}

/// Number of components waiting for the next flush.
pub fn pending_count() -> usize {
    RUNTIME.with(|rt| rt.borrow().dirty.len())
}

// ---------------------------------------------------------------------------
// Test helper: reset the thread-local runtime between tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) fn reset_runtime() {
    RUNTIME.with(|rt| {
        *rt.borrow_mut() = Runtime::new();
    });
}

// ===========================================================================
// Tests
// ===========================================================================
