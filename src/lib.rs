//! # kumiki-core
//!
//! A reactive view-recomposition core for declarative UIs.
//!
//! Components own state cells and a pure `view()` that maps current state to
//! a tree of view nodes. Writing a cell dirties its component; once per tick
//! the scheduler re-renders every dirty component exactly once and the
//! reconciler diffs the new tree against the last one, producing a minimal
//! patch for the renderer.
//!
//! ## Core Systems
//!
//! - **[`reactive`]** — State cells, the thread-local runtime, cross-thread writes
//! - **[`view`]** — View nodes, typed widget options, chained and nested builders
//! - **[`component`]** — Component trait, construction scope, registry, lifecycle
//! - **[`scheduler`]** — Per-tick flush with coalescing and failure isolation
//! - **[`reconcile`]** — Keyed list diff and the Insert/Remove/Update patch
//! - **[`theme`]** — Named palettes and the current-theme setting
//! - **[`event`]** — Terminal input, key commands, activation dispatch
//! - **[`render`]** — Renderer trait, retained widget tree, text painting, crossterm driver
//! - **[`host`]** — Terminal and headless hosts
//! - **[`app`]** — Application struct tying everything together
//! - **[`testing`]** — Headless pilot and snapshot helpers
//! - **[`demos`]** — Counter, theme switcher, launcher
//! - **[`geometry`]** — Size and Spacing primitives

// Foundation
pub mod geometry;

// Reactive core
pub mod component;
pub mod reactive;
pub mod reconcile;
pub mod scheduler;
pub mod view;

// Surface
pub mod event;
pub mod render;
pub mod theme;

// Application
pub mod app;
pub mod host;

// Testing and demos
pub mod demos;
pub mod testing;

pub mod prelude;
