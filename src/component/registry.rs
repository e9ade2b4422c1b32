//! Mounted components and their last rendered trees.

use slotmap::SecondaryMap;

use super::lifecycle::LifecycleTracker;
use super::scope::Scope;
use super::Component;
use crate::reactive::runtime;
use crate::reactive::ComponentId;
use crate::reconcile::{self, Patch};
use crate::view::ViewNode;

struct Mounted {
    component: Box<dyn Component>,
    last_tree: Option<ViewNode>,
    renders: u64,
}

/// Owns every mounted component.
///
/// The runtime slot (state cells, render status) and the registry entry share
/// one [`ComponentId`]. Dropping the registry releases all of its components.
#[derive(Default)]
pub struct Registry {
    mounted: SecondaryMap<ComponentId, Mounted>,
    order: Vec<ComponentId>,
    lifecycle: LifecycleTracker,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct and mount a component. `build` declares its cells on the
    /// scope. The component starts dirty, so the next flush renders it.
    pub fn mount<C: Component>(&mut self, build: impl FnOnce(&mut Scope) -> C) -> ComponentId {
        let id = runtime::register_component("<building>");
        let mut scope = Scope::new(id);
        let component = build(&mut scope);
        runtime::set_component_name(id, component.name());
        tracing::debug!(component = ?id, name = component.name(), cells = scope.cell_count(), "mounted");
        self.mounted.insert(
            id,
            Mounted {
                component: Box::new(component),
                last_tree: None,
                renders: 0,
            },
        );
        self.order.push(id);
        self.lifecycle.on_mount(id);
        id
    }

    /// Destroy a component and release its cells. Returns the patch that
    /// clears its displayed tree (`None` if it was never rendered or isn't
    /// mounted).
    pub fn unmount(&mut self, id: ComponentId) -> Option<Patch> {
        let mounted = self.mounted.remove(id)?;
        self.order.retain(|&other| other != id);
        runtime::release_component(id);
        self.lifecycle.on_unmount(id);
        tracing::debug!(component = ?id, name = mounted.component.name(), "unmounted");
        mounted.last_tree.map(|_| reconcile::removal())
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.mounted.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Mounted component ids in mount order.
    pub fn ids(&self) -> &[ComponentId] {
        &self.order
    }

    pub fn get(&self, id: ComponentId) -> Option<&dyn Component> {
        self.mounted.get(id).map(|m| m.component.as_ref())
    }

    pub fn name(&self, id: ComponentId) -> Option<&str> {
        self.mounted.get(id).map(|m| m.component.name())
    }

    /// The tree currently displayed for `id`.
    pub fn last_tree(&self, id: ComponentId) -> Option<&ViewNode> {
        self.mounted.get(id).and_then(|m| m.last_tree.as_ref())
    }

    /// How many times `view()` has been invoked for `id`.
    pub fn render_count(&self, id: ComponentId) -> u64 {
        self.mounted.get(id).map_or(0, |m| m.renders)
    }

    pub fn lifecycle(&mut self) -> &mut LifecycleTracker {
        &mut self.lifecycle
    }

    pub(crate) fn record_render(&mut self, id: ComponentId, ok: bool) {
        if let Some(mounted) = self.mounted.get_mut(id) {
            mounted.renders += 1;
        }
        self.lifecycle.on_render(id, ok);
    }

    /// Replace the displayed tree, returning the previous one.
    pub(crate) fn replace_tree(&mut self, id: ComponentId, tree: ViewNode) -> Option<ViewNode> {
        self.mounted
            .get_mut(id)
            .and_then(|m| m.last_tree.replace(tree))
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        for id in self.order.drain(..) {
            runtime::release_component(id);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{LifecycleEvent, ViewResult};
    use crate::reactive::runtime::reset_runtime;
    use crate::reactive::{State, StateAccessError};
    use crate::view::chained::text;

    struct Label {
        value: State<String>,
    }

    impl Component for Label {
        fn name(&self) -> &str {
            "Label"
        }

        fn view(&self) -> ViewResult {
            Ok(text(self.value.get()?))
        }
    }

    fn mount_label(registry: &mut Registry) -> (ComponentId, State<String>) {
        let mut handle = None;
        let id = registry.mount(|scope| {
            let value = scope.state(String::from("hi"));
            handle = Some(value);
            Label { value }
        });
        (id, handle.unwrap())
    }

    #[test]
    fn mount_registers_dirty_component() {
        reset_runtime();
        let mut registry = Registry::new();
        let (id, _) = mount_label(&mut registry);
        assert!(registry.contains(id));
        assert_eq!(registry.name(id), Some("Label"));
        assert!(runtime::is_dirty(id));
        assert_eq!(runtime::cell_count(id), Some(1));
        assert!(registry.last_tree(id).is_none());
        assert_eq!(registry.lifecycle().pending_events(), vec![LifecycleEvent::Mount { component: id }]);
    }

    #[test]
    fn unmount_releases_cells() {
        reset_runtime();
        let mut registry = Registry::new();
        let (id, value) = mount_label(&mut registry);
        assert_eq!(registry.unmount(id), None);
        assert!(!registry.contains(id));
        assert_eq!(
            value.set("bye".into()),
            Err(StateAccessError::ComponentReleased { component: id })
        );
        assert_eq!(registry.unmount(id), None);
    }

    #[test]
    fn unmount_of_rendered_component_removes_tree() {
        reset_runtime();
        let mut registry = Registry::new();
        let (id, _) = mount_label(&mut registry);
        registry.replace_tree(id, text("hi"));
        assert_eq!(registry.unmount(id), Some(reconcile::removal()));
    }

    #[test]
    fn ids_follow_mount_order() {
        reset_runtime();
        let mut registry = Registry::new();
        let (a, _) = mount_label(&mut registry);
        let (b, _) = mount_label(&mut registry);
        assert_eq!(registry.ids(), &[a, b]);
        registry.unmount(a);
        assert_eq!(registry.ids(), &[b]);
    }

    #[test]
    fn drop_releases_everything() {
        reset_runtime();
        let id = {
            let mut registry = Registry::new();
            mount_label(&mut registry).0
        };
        assert!(!runtime::is_alive(id));
    }
}
