//! Activation dispatch: find the targeted node in a component's displayed
//! tree and invoke its click handler synchronously.

use crate::component::Registry;
use crate::reactive::{ComponentId, StateAccessError};
use crate::view::{NodeKind, ViewNode};

/// Errors delivering an activation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("component {0:?} is not mounted or has not rendered")]
    UnknownComponent(ComponentId),
    #[error("no node at {path:?}")]
    NoSuchNode { path: Vec<usize> },
    #[error("node at {path:?} has no click handler")]
    NoHandler { path: Vec<usize> },
    #[error("no activatable widget labelled {0:?}")]
    NoSuchLabel(String),
    #[error(transparent)]
    State(#[from] StateAccessError),
}

/// An activation aimed at one node, addressed like patch paths (the
/// component root is `[0]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Activation {
    pub component: ComponentId,
    pub path: Vec<usize>,
}

impl Activation {
    pub fn new(component: ComponentId, path: Vec<usize>) -> Self {
        Self { component, path }
    }
}

/// Node at an absolute path within a component's tree.
pub fn node_at<'a>(tree: &'a ViewNode, path: &[usize]) -> Option<&'a ViewNode> {
    match path.split_first() {
        Some((0, rest)) => tree.descendant(rest),
        _ => None,
    }
}

/// Absolute path of the first button or checkbox whose label is `label`.
pub fn find_activatable(tree: &ViewNode, label: &str) -> Option<Vec<usize>> {
    tree.find(|node| {
        matches!(node.kind(), NodeKind::Button | NodeKind::Checkbox) && node.text() == Some(label)
    })
    .map(|relative| {
        let mut path = vec![0];
        path.extend(relative);
        path
    })
}

/// Invoke the handler of the targeted node. The caller runs the flush.
pub fn dispatch(registry: &Registry, activation: &Activation) -> Result<(), DispatchError> {
    let tree = registry
        .last_tree(activation.component)
        .ok_or(DispatchError::UnknownComponent(activation.component))?;
    let node = node_at(tree, &activation.path).ok_or_else(|| DispatchError::NoSuchNode {
        path: activation.path.clone(),
    })?;
    let handler = node.handler().ok_or_else(|| DispatchError::NoHandler {
        path: activation.path.clone(),
    })?;
    tracing::trace!(component = ?activation.component, path = ?activation.path, "activation");
    // Cloned so the registry borrow ends before state is written.
    let handler = handler.clone();
    handler.invoke()?;
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ViewResult};
    use crate::reactive::runtime::reset_runtime;
    use crate::reactive::State;
    use crate::scheduler::Scheduler;
    use crate::view::chained::{button, checkbox, column, text};
    use crate::view::Attributes;

    struct Clicker {
        clicks: State<u32>,
    }

    impl Component for Clicker {
        fn name(&self) -> &str {
            "Clicker"
        }

        fn view(&self) -> ViewResult {
            Ok(column([
                text(format!("{}", self.clicks.get()?)),
                button("Click").on_click(self.clicks.updater(|n| n + 1)),
                button("Dead"),
            ]))
        }
    }

    fn setup() -> (Registry, ComponentId, State<u32>) {
        reset_runtime();
        let mut registry = Registry::new();
        let mut cell = None;
        let id = registry.mount(|scope| {
            let clicks = scope.state(0u32);
            cell = Some(clicks);
            Clicker { clicks }
        });
        Scheduler::new().flush(&mut registry);
        (registry, id, cell.unwrap())
    }

    #[test]
    fn node_at_requires_root_prefix() {
        let tree = column([text("a")]);
        assert_eq!(node_at(&tree, &[0, 0]), Some(&text("a")));
        assert_eq!(node_at(&tree, &[1]), None);
        assert_eq!(node_at(&tree, &[]), None);
    }

    #[test]
    fn find_by_label() {
        let tree = column([text("Click"), checkbox("Dark"), button("Click")]);
        assert_eq!(find_activatable(&tree, "Click"), Some(vec![0, 2]));
        assert_eq!(find_activatable(&tree, "Dark"), Some(vec![0, 1]));
        assert_eq!(find_activatable(&tree, "Nope"), None);
    }

    #[test]
    fn dispatch_invokes_handler() {
        let (registry, id, clicks) = setup();
        dispatch(&registry, &Activation::new(id, vec![0, 1])).unwrap();
        assert_eq!(clicks.get().unwrap(), 1);
    }

    #[test]
    fn dispatch_errors() {
        let (mut registry, id, _) = setup();
        assert_eq!(
            dispatch(&registry, &Activation::new(id, vec![0, 2])),
            Err(DispatchError::NoHandler { path: vec![0, 2] })
        );
        assert_eq!(
            dispatch(&registry, &Activation::new(id, vec![0, 9])),
            Err(DispatchError::NoSuchNode { path: vec![0, 9] })
        );
        registry.unmount(id);
        assert_eq!(
            dispatch(&registry, &Activation::new(id, vec![0, 1])),
            Err(DispatchError::UnknownComponent(id))
        );
    }
}
