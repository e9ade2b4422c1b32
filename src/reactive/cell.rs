//! `State<T>`: a typed handle to one observable state cell.
//!
//! A `State<T>` is `Copy` and only stores the cell address; the value lives in
//! the thread-local runtime, owned by the component that declared it. Reading
//! inside `view()` subscribes the rendering component; writing marks the owner
//! (and subscribers) dirty for the next flush.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Not, Sub};

use super::runtime::{self, CellRef, ComponentId, StateAccessError, WriteOutcome};
use crate::view::handler::{Capture, Handler};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Handle to a state cell owned by a component.
pub struct State<T: 'static> {
    cell: CellRef,
    _marker: PhantomData<fn() -> T>,
}

// Manual impls so we don't require T: Copy/Clone for the handle itself.
impl<T: 'static> Copy for State<T> {}
impl<T: 'static> Clone for State<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> PartialEq for State<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}
impl<T: 'static> Eq for State<T> {}

impl<T: 'static> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("component", &self.cell.component)
            .field("index", &self.cell.index)
            .finish()
    }
}

impl<T: 'static> State<T> {
    pub(crate) fn from_cell(cell: CellRef) -> Self {
        Self {
            cell,
            _marker: PhantomData,
        }
    }

    /// Cell address (owning component + declaration index).
    pub fn cell(&self) -> CellRef {
        self.cell
    }

    /// The owning component.
    pub fn owner(&self) -> ComponentId {
        self.cell.component
    }

    /// Declaration index within the owner.
    pub fn index(&self) -> usize {
        self.cell.index
    }

    /// Read by reference without cloning. Subscribes the rendering component.
    ///
    /// `f` must not write to any state cell.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, StateAccessError> {
        runtime::read(self.cell, true, f)
    }

    /// Read the current value. Subscribes the rendering component.
    pub fn get(&self) -> Result<T, StateAccessError>
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Read without subscribing anyone.
    pub fn get_untracked(&self) -> Result<T, StateAccessError>
    where
        T: Clone,
    {
        runtime::read(self.cell, false, T::clone)
    }

    /// Replace the value. A write equal to the current value does nothing; a
    /// write while the owner is rendering lands after that render.
    pub fn set(&self, value: T) -> Result<WriteOutcome, StateAccessError>
    where
        T: PartialEq,
    {
        runtime::write(self.cell, value)
    }

    /// Mutate in place. Schedules a re-render only if the value changed.
    pub fn update(&self, f: impl FnOnce(&mut T) + 'static) -> Result<WriteOutcome, StateAccessError>
    where
        T: Clone + PartialEq,
    {
        runtime::modify::<T>(self.cell, move |value| {
            let before = value.clone();
            f(value);
            *value != before
        })
    }

    /// `+=` sugar: `set(value + delta)`.
    pub fn increment_by(&self, delta: T) -> Result<WriteOutcome, StateAccessError>
    where
        T: Clone + PartialEq + Add<Output = T>,
    {
        let current = self.get_untracked()?;
        self.set(current + delta)
    }

    /// `-=` sugar: `set(value - delta)`.
    pub fn decrement_by(&self, delta: T) -> Result<WriteOutcome, StateAccessError>
    where
        T: Clone + PartialEq + Sub<Output = T>,
    {
        let current = self.get_untracked()?;
        self.set(current - delta)
    }

    /// Flip a boolean-like value.
    pub fn toggle(&self) -> Result<WriteOutcome, StateAccessError>
    where
        T: Clone + PartialEq + Not<Output = T>,
    {
        let current = self.get_untracked()?;
        self.set(!current)
    }

    /// A click handler that sets this cell to `value`.
    pub fn setter(&self, value: T) -> Handler
    where
        T: Clone + PartialEq,
    {
        let state = *self;
        Handler::with_capture(self.capture(), move || state.set(value.clone()).map(|_| ()))
    }

    /// A click handler that replaces the value with `f(current)`.
    pub fn updater(&self, f: impl Fn(&T) -> T + 'static) -> Handler
    where
        T: PartialEq,
    {
        let state = *self;
        Handler::with_capture(self.capture(), move || {
            let next = runtime::read(state.cell, false, |v: &T| f(v))?;
            state.set(next).map(|_| ())
        })
    }

    fn capture(&self) -> Capture {
        Capture::new(self.cell.component).with_cell(self.cell.index)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
