//! Scheduler / recomposer.
//!
//! A flush snapshots the dirty set, then for each dirty component (in mount
//! order) runs `view()` once, diffs the result against the last displayed tree
//! and keeps the new tree. A failing `view()` leaves the old tree displayed and
//! is reported; it never stops other components from flushing.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::component::{Component, Registry, RenderError, ViewResult};
use crate::reactive::runtime;
use crate::reactive::ComponentId;
use crate::reconcile::{self, Patch, ReconcileError};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// The patch produced for one component.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub component: ComponentId,
    pub patch: Patch,
    /// Subtree replacements the reconciler fell back to.
    pub fallbacks: Vec<ReconcileError>,
}

/// A component whose render failed this flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub component: ComponentId,
    pub name: String,
    pub error: RenderError,
}

/// Everything one flush did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushReport {
    /// Non-empty patches, in render order.
    pub frames: Vec<Frame>,
    pub failures: Vec<Failure>,
    /// Every component whose `view()` ran, in render order.
    pub rendered: Vec<ComponentId>,
}

impl FlushReport {
    /// Whether nothing was rendered.
    pub fn is_idle(&self) -> bool {
        self.rendered.is_empty()
    }

    pub fn frame(&self, component: ComponentId) -> Option<&Frame> {
        self.frames.iter().find(|f| f.component == component)
    }

    pub fn failure(&self, component: ComponentId) -> Option<&Failure> {
        self.failures.iter().find(|f| f.component == component)
    }

    /// How many times `component` rendered in this flush (0 or 1).
    pub fn render_count(&self, component: ComponentId) -> usize {
        self.rendered.iter().filter(|&&id| id == component).count()
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Drives flushes and counts ticks.
#[derive(Debug, Default)]
pub struct Scheduler {
    ticks: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flushes run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether any component is waiting to be rendered.
    pub fn has_pending(&self) -> bool {
        runtime::pending_count() > 0
    }

    /// Re-render every dirty component exactly once.
    pub fn flush(&mut self, registry: &mut Registry) -> FlushReport {
        self.ticks += 1;
        let dirty = runtime::take_dirty();
        let mut report = FlushReport::default();

        for id in dirty {
            let Some(component) = registry.get(id) else {
                continue;
            };
            let name = component.name().to_owned();
            let result = render(component, id);
            report.rendered.push(id);
            registry.record_render(id, result.is_ok());

            match result {
                Ok(tree) => {
                    let diff = reconcile::diff_report(registry.last_tree(id), &tree);
                    registry.replace_tree(id, tree);
                    if !diff.patch.is_empty() {
                        tracing::debug!(component = ?id, %name, ops = diff.patch.len(), "patch");
                        report.frames.push(Frame {
                            component: id,
                            patch: diff.patch,
                            fallbacks: diff.fallbacks,
                        });
                    }
                }
                Err(error) => {
                    tracing::warn!(component = ?id, %name, %error, "render failed; keeping previous tree");
                    report.failures.push(Failure { component: id, name, error });
                }
            }
        }

        if !report.is_idle() {
            tracing::debug!(
                tick = self.ticks,
                rendered = report.rendered.len(),
                frames = report.frames.len(),
                failures = report.failures.len(),
                "flush"
            );
        }
        report
    }
}

/// Run one `view()` inside the render bracket, turning panics into errors.
fn render(component: &dyn Component, id: ComponentId) -> ViewResult {
    runtime::begin_render(id)?;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| component.view()));
    let applied = runtime::end_render(id);
    if applied > 0 {
        tracing::trace!(component = ?id, applied, "deferred writes applied after render");
    }
    match outcome {
        Ok(result) => result,
        Err(payload) => Err(RenderError::Panicked { message: panic_message(payload.as_ref()) }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::runtime::reset_runtime;
    use crate::reactive::{RenderStatus, State, WriteOutcome};
    use crate::reconcile::PatchOp;
    use crate::view::chained::{column, text};
    use pretty_assertions::assert_eq;

    // -- Test components ----------------------------------------------------

    struct Pair {
        a: State<i32>,
        b: State<i32>,
    }

    impl Component for Pair {
        fn name(&self) -> &str {
            "Pair"
        }

        fn view(&self) -> ViewResult {
            Ok(column([text(format!("{} {}", self.a.get()?, self.b.get()?))]))
        }
    }

    /// Writes to its own state while rendering.
    struct SelfWriter {
        n: State<i32>,
    }

    impl Component for SelfWriter {
        fn name(&self) -> &str {
            "SelfWriter"
        }

        fn view(&self) -> ViewResult {
            let seen = self.n.get()?;
            let outcome = self.n.set(seen + 1)?;
            assert_eq!(outcome, WriteOutcome::Deferred);
            // Still the snapshot value.
            assert_eq!(self.n.get()?, seen);
            Ok(text(seen.to_string()))
        }
    }

    struct Fails {
        panic: State<bool>,
    }

    impl Component for Fails {
        fn name(&self) -> &str {
            "Fails"
        }

        fn view(&self) -> ViewResult {
            if self.panic.get()? {
                panic!("boom");
            }
            Err(RenderError::Invalid("not today".into()))
        }
    }

    fn mount_pair(registry: &mut Registry) -> (ComponentId, State<i32>, State<i32>) {
        let mut cells = None;
        let id = registry.mount(|scope| {
            let pair = Pair { a: scope.state(0), b: scope.state(0) };
            cells = Some((pair.a, pair.b));
            pair
        });
        let (a, b) = cells.unwrap();
        (id, a, b)
    }

    // -- Tests --------------------------------------------------------------

    #[test]
    fn first_flush_inserts_root() {
        reset_runtime();
        let mut registry = Registry::new();
        let (id, ..) = mount_pair(&mut registry);
        let report = Scheduler::new().flush(&mut registry);
        assert_eq!(report.rendered, vec![id]);
        let frame = report.frame(id).unwrap();
        assert_eq!(
            frame.patch.ops(),
            &[PatchOp::Insert { parent: vec![], index: 0, node: column([text("0 0")]) }]
        );
        assert_eq!(runtime::status(id), Some(RenderStatus::Clean));
    }

    #[test]
    fn clean_flush_is_idle() {
        reset_runtime();
        let mut registry = Registry::new();
        mount_pair(&mut registry);
        let mut scheduler = Scheduler::new();
        scheduler.flush(&mut registry);
        let report = scheduler.flush(&mut registry);
        assert!(report.is_idle());
        assert_eq!(scheduler.ticks(), 2);
    }

    #[test]
    fn multiple_writes_coalesce() {
        reset_runtime();
        let mut registry = Registry::new();
        let (id, a, b) = mount_pair(&mut registry);
        let mut scheduler = Scheduler::new();
        scheduler.flush(&mut registry);

        a.set(1).unwrap();
        a.set(2).unwrap();
        b.set(3).unwrap();
        assert!(scheduler.has_pending());
        let report = scheduler.flush(&mut registry);
        assert_eq!(report.render_count(id), 1);
        assert_eq!(registry.render_count(id), 2);
        assert_eq!(registry.last_tree(id), Some(&column([text("2 3")])));
    }

    #[test]
    fn equal_write_does_not_render() {
        reset_runtime();
        let mut registry = Registry::new();
        let (_, a, _) = mount_pair(&mut registry);
        let mut scheduler = Scheduler::new();
        scheduler.flush(&mut registry);
        assert_eq!(a.set(0).unwrap(), WriteOutcome::Unchanged);
        assert!(scheduler.flush(&mut registry).is_idle());
    }

    #[test]
    fn write_during_render_lands_next_tick() {
        reset_runtime();
        let mut registry = Registry::new();
        let id = registry.mount(|scope| SelfWriter { n: scope.state(0) });
        let mut scheduler = Scheduler::new();

        let first = scheduler.flush(&mut registry);
        assert_eq!(first.render_count(id), 1);
        assert_eq!(registry.last_tree(id), Some(&text("0")));
        assert!(runtime::is_dirty(id));
        assert_eq!(runtime::status(id), Some(RenderStatus::Dirty));

        let second = scheduler.flush(&mut registry);
        assert_eq!(second.render_count(id), 1);
        assert_eq!(registry.last_tree(id), Some(&text("1")));
    }

    #[test]
    fn failure_keeps_previous_tree_and_goes_clean() {
        reset_runtime();
        let mut registry = Registry::new();
        let id = registry.mount(|scope| Fails { panic: scope.state(false) });
        let (ok_id, ..) = mount_pair(&mut registry);
        registry.replace_tree(id, text("old"));

        let report = Scheduler::new().flush(&mut registry);
        assert_eq!(
            report.failure(id).map(|f| &f.error),
            Some(&RenderError::Invalid("not today".into()))
        );
        assert_eq!(report.failure(id).map(|f| f.name.as_str()), Some("Fails"));
        // The other component still flushed.
        assert!(report.frame(ok_id).is_some());
        assert_eq!(registry.last_tree(id), Some(&text("old")));
        assert_eq!(runtime::status(id), Some(RenderStatus::Clean));
        assert!(!runtime::is_dirty(id));
    }

    #[test]
    fn panic_becomes_render_error() {
        reset_runtime();
        let mut registry = Registry::new();
        let id = registry.mount(|scope| Fails { panic: scope.state(true) });
        let report = Scheduler::new().flush(&mut registry);
        assert_eq!(
            report.failure(id).map(|f| f.error.clone()),
            Some(RenderError::Panicked { message: "boom".into() })
        );
        assert_eq!(runtime::current_render(), None);
        assert_eq!(runtime::status(id), Some(RenderStatus::Clean));
    }

    #[test]
    fn released_cell_read_is_reported() {
        reset_runtime();
        let mut registry = Registry::new();
        let (victim, ..) = mount_pair(&mut registry);
        // Borrows another component's cells, which then go away.
        let id = registry.mount(|_| Pair {
            a: State::from_cell(runtime::CellRef { component: victim, index: 0 }),
            b: State::from_cell(runtime::CellRef { component: victim, index: 1 }),
        });
        registry.unmount(victim);
        let report = Scheduler::new().flush(&mut registry);
        assert!(matches!(
            report.failure(id).map(|f| &f.error),
            Some(RenderError::State(_))
        ));
    }

    #[test]
    fn renders_in_mount_order() {
        reset_runtime();
        let mut registry = Registry::new();
        let (first, a1, _) = mount_pair(&mut registry);
        let (second, a2, _) = mount_pair(&mut registry);
        let mut scheduler = Scheduler::new();
        scheduler.flush(&mut registry);
        a2.set(5).unwrap();
        a1.set(5).unwrap();
        assert_eq!(scheduler.flush(&mut registry).rendered, vec![first, second]);
    }

    #[test]
    fn handler_write_produces_single_update() {
        reset_runtime();
        let mut registry = Registry::new();
        let (id, a, _) = mount_pair(&mut registry);
        let mut scheduler = Scheduler::new();
        scheduler.flush(&mut registry);
        let handler = a.setter(7);
        handler.invoke().unwrap();
        let report = scheduler.flush(&mut registry);
        let frame = report.frame(id).unwrap();
        assert_eq!(frame.patch.update_count(), 1);
        assert_eq!(frame.patch.len(), 1);
    }
}
