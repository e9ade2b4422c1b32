//! Nested-scope builder form.
//!
//! A container factory takes its configuration and a block. Child factories
//! called on the block's [`Ui`] scope append to that container in call order
//! and hand back a [`NodeMut`] for setting options in place:
//!
//! ```ignore
//! nested::column(Options::new().padding(16).spacing(8), |ui| {
//!     ui.text("Count: 0").font_size(24);
//!     ui.row(Options::new().spacing(8), |ui| {
//!         ui.button("-");
//!         ui.button("+");
//!     });
//! })
//! ```

use super::handler::Handler;
use super::node::{Attributes, Key, NodeKind, ViewNode};
use super::props::{Alignment, Color, Prop, PropValue};
use crate::geometry::Spacing;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Named configuration for a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub padding: Option<Spacing>,
    pub spacing: Option<u32>,
    pub align: Option<Alignment>,
    pub background: Option<Color>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub key: Option<Key>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform padding on all four sides.
    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = Some(Spacing::all(padding));
        self
    }

    pub fn padding_each(mut self, padding: Spacing) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn spacing(mut self, spacing: u32) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn fixed_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    fn apply(self, node: &mut ViewNode) {
        let Options { padding, spacing, align, background, width, height, key } = self;
        if let Some(padding) = padding {
            node.apply_prop(Prop::Padding, PropValue::Spacing(padding));
        }
        if let Some(spacing) = spacing {
            node.apply_prop(Prop::Spacing, PropValue::Number(spacing));
        }
        if let Some(align) = align {
            node.apply_prop(Prop::Align, PropValue::Align(align));
        }
        if let Some(background) = background {
            node.apply_prop(Prop::Background, PropValue::Color(background));
        }
        if let Some(width) = width {
            node.apply_prop(Prop::Width, PropValue::Number(width));
        }
        if let Some(height) = height {
            node.apply_prop(Prop::Height, PropValue::Number(height));
        }
        if let Some(key) = key {
            node.set_key(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level factories
// ---------------------------------------------------------------------------

fn build(kind: NodeKind, options: Options, block: impl FnOnce(&mut Ui)) -> ViewNode {
    let mut ui = Ui { children: Vec::new() };
    block(&mut ui);
    let mut node = ViewNode::new(kind);
    options.apply(&mut node);
    for child in ui.children {
        node.push_child(child);
    }
    node
}

/// Vertical stack whose children are appended by `block`.
pub fn column(options: Options, block: impl FnOnce(&mut Ui)) -> ViewNode {
    build(NodeKind::Column, options, block)
}

/// Horizontal stack whose children are appended by `block`.
pub fn row(options: Options, block: impl FnOnce(&mut Ui)) -> ViewNode {
    build(NodeKind::Row, options, block)
}

/// Plain box whose children are appended by `block`.
pub fn container(options: Options, block: impl FnOnce(&mut Ui)) -> ViewNode {
    build(NodeKind::Container, options, block)
}

// ---------------------------------------------------------------------------
// Ui scope
// ---------------------------------------------------------------------------

/// Child list of the container currently being built.
#[derive(Debug, Default)]
pub struct Ui {
    children: Vec<ViewNode>,
}

impl Ui {
    fn push(&mut self, node: ViewNode) -> NodeMut<'_> {
        self.children.push(node);
        let index = self.children.len() - 1;
        NodeMut { node: &mut self.children[index] }
    }

    pub fn column(&mut self, options: Options, block: impl FnOnce(&mut Ui)) -> NodeMut<'_> {
        self.push(column(options, block))
    }

    pub fn row(&mut self, options: Options, block: impl FnOnce(&mut Ui)) -> NodeMut<'_> {
        self.push(row(options, block))
    }

    pub fn container(&mut self, options: Options, block: impl FnOnce(&mut Ui)) -> NodeMut<'_> {
        self.push(container(options, block))
    }

    pub fn text(&mut self, content: impl Into<String>) -> NodeMut<'_> {
        self.push(ViewNode::new(NodeKind::Text)).content(content)
    }

    pub fn button(&mut self, label: impl Into<String>) -> NodeMut<'_> {
        self.push(ViewNode::new(NodeKind::Button)).content(label)
    }

    pub fn input(&mut self) -> NodeMut<'_> {
        self.push(ViewNode::new(NodeKind::Input))
    }

    pub fn checkbox(&mut self, label: impl Into<String>) -> NodeMut<'_> {
        self.push(ViewNode::new(NodeKind::Checkbox)).content(label)
    }

    pub fn spacer(&mut self) -> NodeMut<'_> {
        self.push(ViewNode::new(NodeKind::Spacer))
    }

    pub fn divider(&mut self) -> NodeMut<'_> {
        self.push(ViewNode::new(NodeKind::Divider))
    }

    /// Append a node built elsewhere (e.g. by a helper using the chained form).
    pub fn add(&mut self, node: ViewNode) -> NodeMut<'_> {
        self.push(node)
    }

    /// Number of children appended so far.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

// ---------------------------------------------------------------------------
// NodeMut
// ---------------------------------------------------------------------------

/// In-place option setter for a node just appended to a [`Ui`].
#[derive(Debug)]
pub struct NodeMut<'a> {
    node: &'a mut ViewNode,
}

impl NodeMut<'_> {
    /// The node as built so far.
    pub fn node(&self) -> &ViewNode {
        self.node
    }
}

impl Attributes for NodeMut<'_> {
    fn with_prop(self, prop: Prop, value: PropValue) -> Self {
        self.node.apply_prop(prop, value);
        self
    }

    fn with_key(self, key: impl Into<Key>) -> Self {
        self.node.set_key(key.into());
        self
    }

    fn on_click(self, handler: impl Into<Handler>) -> Self {
        self.node.set_handler(handler.into());
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
