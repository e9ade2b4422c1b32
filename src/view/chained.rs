//! Chained-attribute builder form.
//!
//! Container factories take their children up front as an ordered list; every
//! node then exposes [`Attributes`](super::node::Attributes) setters that
//! return the node, so options compose by chaining:
//!
//! ```ignore
//! column([
//!     text("Count: 0").font_size(24),
//!     row([button("-"), button("+")]).spacing(8),
//! ])
//! .padding(16)
//! .spacing(8)
//! ```

use super::node::{Attributes, NodeKind, ViewNode};

fn container_of(kind: NodeKind, children: impl IntoIterator<Item = ViewNode>) -> ViewNode {
    children
        .into_iter()
        .fold(ViewNode::new(kind), |node, child| node.child(child))
}

/// Vertical stack of `children`.
pub fn column(children: impl IntoIterator<Item = ViewNode>) -> ViewNode {
    container_of(NodeKind::Column, children)
}

/// Horizontal stack of `children`.
pub fn row(children: impl IntoIterator<Item = ViewNode>) -> ViewNode {
    container_of(NodeKind::Row, children)
}

/// Plain box around `children`.
pub fn container(children: impl IntoIterator<Item = ViewNode>) -> ViewNode {
    container_of(NodeKind::Container, children)
}

pub fn text(content: impl Into<String>) -> ViewNode {
    ViewNode::new(NodeKind::Text).content(content)
}

pub fn button(label: impl Into<String>) -> ViewNode {
    ViewNode::new(NodeKind::Button).content(label)
}

pub fn input() -> ViewNode {
    ViewNode::new(NodeKind::Input)
}

pub fn checkbox(label: impl Into<String>) -> ViewNode {
    ViewNode::new(NodeKind::Checkbox).content(label)
}

pub fn spacer() -> ViewNode {
    ViewNode::new(NodeKind::Spacer)
}

pub fn divider() -> ViewNode {
    ViewNode::new(NodeKind::Divider)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::props::{Prop, PropValue, Variant};

    #[test]
    fn children_keep_argument_order() {
        let tree = column([text("a"), text("b"), text("c")]);
        let labels: Vec<_> = tree.children().iter().filter_map(ViewNode::text).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn chains_compose() {
        let node = button("Delete").variant(Variant::Danger).fixed_size(120, 32).font_size(14);
        assert_eq!(node.kind(), NodeKind::Button);
        assert_eq!(node.prop(Prop::Kind), Some(&PropValue::Variant(Variant::Danger)));
        assert_eq!(node.prop(Prop::FontSize), Some(&PropValue::Number(14)));
    }

    #[test]
    fn checkbox_checked() {
        assert!(checkbox("Remember me").checked(true).is_checked());
        assert!(!checkbox("Remember me").is_checked());
    }

    #[test]
    fn leaf_factories() {
        assert_eq!(spacer().kind(), NodeKind::Spacer);
        assert_eq!(divider().kind(), NodeKind::Divider);
        assert_eq!(input().placeholder("Name").prop(Prop::Placeholder).and_then(PropValue::as_text), Some("Name"));
        assert!(row(Vec::new()).children().is_empty());
        assert_eq!(container([spacer()]).children().len(), 1);
    }
}
