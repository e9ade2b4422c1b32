//! ViewNode: one immutable node of the declarative UI tree.
//!
//! A node is a kind tag, an optional reconciliation key, a property map over
//! the closed [`Prop`] set, an optional click handler, and (for container
//! kinds) an ordered child list. Both builder front-ends produce this type;
//! the [`Attributes`] trait is the single place option setters are defined.

use std::collections::BTreeMap;
use std::fmt;

use super::handler::Handler;
use super::props::{Alignment, Color, Prop, PropError, PropValue, Variant};
use crate::geometry::Spacing;

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Widget kind of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Column,
    Row,
    Text,
    Button,
    Input,
    Checkbox,
    Spacer,
    Divider,
    Container,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Column => "Column",
            NodeKind::Row => "Row",
            NodeKind::Text => "Text",
            NodeKind::Button => "Button",
            NodeKind::Input => "Input",
            NodeKind::Checkbox => "Checkbox",
            NodeKind::Spacer => "Spacer",
            NodeKind::Divider => "Divider",
            NodeKind::Container => "Container",
        }
    }

    /// Whether nodes of this kind carry children.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Column | NodeKind::Row | NodeKind::Container)
    }

    /// Whether this kind recognizes `prop`.
    pub fn accepts(self, prop: Prop) -> bool {
        use Prop::*;
        match self {
            NodeKind::Column | NodeKind::Row => {
                matches!(prop, Padding | Spacing | Background | Align | Width | Height)
            }
            NodeKind::Container => matches!(prop, Padding | Background | Align | Width | Height),
            NodeKind::Text => matches!(prop, Text | FontSize | Color | Align | Width | Height),
            NodeKind::Button => {
                matches!(prop, Text | FontSize | Color | Background | Kind | Width | Height)
            }
            NodeKind::Input => {
                matches!(prop, Value | Placeholder | FontSize | Color | Width | Height)
            }
            NodeKind::Checkbox => matches!(prop, Text | Checked | FontSize | Color),
            NodeKind::Spacer => matches!(prop, Width | Height),
            NodeKind::Divider => matches!(prop, Color | Height),
        }
    }

    /// Whether this kind can be activated (carries a click handler).
    pub fn accepts_handler(self) -> bool {
        matches!(self, NodeKind::Button | NodeKind::Checkbox)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Author-supplied stable identity for reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key(s)
    }
}

impl From<u64> for Key {
    fn from(n: u64) -> Self {
        Key(n.to_string())
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Key(n.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ViewNode
// ---------------------------------------------------------------------------

/// A node of the declarative view tree.
#[derive(Clone)]
pub struct ViewNode {
    kind: NodeKind,
    key: Option<Key>,
    props: BTreeMap<Prop, PropValue>,
    handler: Option<Handler>,
    children: Vec<ViewNode>,
}

impl ViewNode {
    /// Create an empty node of the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            key: None,
            props: BTreeMap::new(),
            handler: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn props(&self) -> &BTreeMap<Prop, PropValue> {
        &self.props
    }

    pub fn prop(&self, prop: Prop) -> Option<&PropValue> {
        self.props.get(&prop)
    }

    /// The `text` option (label of buttons and checkboxes, content of text).
    pub fn text(&self) -> Option<&str> {
        self.prop(Prop::Text).and_then(PropValue::as_text)
    }

    pub fn is_checked(&self) -> bool {
        self.prop(Prop::Checked).and_then(PropValue::as_bool).unwrap_or(false)
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    pub fn children(&self) -> &[ViewNode] {
        &self.children
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Set an option, failing if the kind doesn't recognize it or the value
    /// has the wrong type.
    pub fn try_prop(mut self, prop: Prop, value: PropValue) -> Result<Self, PropError> {
        self.set_prop(prop, value)?;
        Ok(self)
    }

    /// Set an option from its keyword spelling, e.g. `("font_size", "24")`.
    pub fn try_option(self, name: &str, raw: &str) -> Result<Self, PropError> {
        let prop: Prop = name.parse()?;
        let value = PropValue::parse(prop, raw)?;
        self.try_prop(prop, value)
    }

    /// Append a child (chained form). Ignored with a warning on leaf kinds.
    pub fn child(mut self, child: ViewNode) -> Self {
        self.push_child(child);
        self
    }

    pub(crate) fn set_prop(&mut self, prop: Prop, value: PropValue) -> Result<(), PropError> {
        if !self.kind.accepts(prop) {
            return Err(PropError::Unsupported { kind: self.kind, prop });
        }
        if value.value_type() != prop.value_type() {
            return Err(PropError::WrongType { prop, expected: prop.value_type() });
        }
        self.props.insert(prop, value);
        Ok(())
    }

    /// Infallible setter used by the builders: invalid options are dropped.
    pub(crate) fn apply_prop(&mut self, prop: Prop, value: PropValue) {
        if let Err(err) = self.set_prop(prop, value) {
            tracing::warn!(%err, "ignoring widget option");
        }
    }

    pub(crate) fn set_key(&mut self, key: Key) {
        self.key = Some(key);
    }

    pub(crate) fn set_handler(&mut self, handler: Handler) {
        if self.kind.accepts_handler() {
            self.handler = Some(handler);
        } else {
            tracing::warn!(kind = %self.kind, "ignoring click handler on non-activatable widget");
        }
    }

    pub(crate) fn push_child(&mut self, child: ViewNode) -> Option<&mut ViewNode> {
        if !self.kind.is_container() {
            tracing::warn!(kind = %self.kind, child = %child.kind, "ignoring child of leaf widget");
            return None;
        }
        self.children.push(child);
        self.children.last_mut()
    }

    /// Set or clear a property without validation (patch application).
    pub(crate) fn replace_prop(&mut self, prop: Prop, value: Option<PropValue>) {
        match value {
            Some(value) => {
                self.props.insert(prop, value);
            }
            None => {
                self.props.remove(&prop);
            }
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<ViewNode> {
        &mut self.children
    }

    /// The node at `path`, relative to `self` (empty path = `self`).
    pub fn descendant(&self, path: &[usize]) -> Option<&ViewNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Depth-first pre-order walk; `f` receives each node's relative path.
    pub fn walk(&self, f: &mut dyn FnMut(&[usize], &ViewNode)) {
        let mut path = Vec::new();
        self.walk_inner(&mut path, f);
    }

    fn walk_inner(&self, path: &mut Vec<usize>, f: &mut dyn FnMut(&[usize], &ViewNode)) {
        f(path, self);
        for (i, child) in self.children.iter().enumerate() {
            path.push(i);
            child.walk_inner(path, f);
            path.pop();
        }
    }

    /// Relative path of the first node (pre-order) matching `pred`.
    pub fn find(&self, pred: impl Fn(&ViewNode) -> bool) -> Option<Vec<usize>> {
        let mut found = None;
        self.walk(&mut |path, node| {
            if found.is_none() && pred(node) {
                found = Some(path.to_vec());
            }
        });
        found
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ViewNode::node_count).sum::<usize>()
    }
}

impl PartialEq for ViewNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.key == other.key
            && self.props == other.props
            && self.handler.is_some() == other.handler.is_some()
            && self.children == other.children
    }
}

impl fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.kind.name());
        if let Some(key) = &self.key {
            s.field("key", key);
        }
        for (prop, value) in &self.props {
            s.field(prop.name(), value);
        }
        if self.handler.is_some() {
            s.field("on_click", &true);
        }
        if self.kind.is_container() {
            s.field("children", &self.children);
        }
        s.finish()
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// Chainable option setters shared by both builder front-ends.
///
/// Implemented by [`ViewNode`] (by value) and by the nested form's
/// [`NodeMut`](super::nested::NodeMut), so every option is spelled once.
pub trait Attributes: Sized {
    /// Set a raw option. Unsupported options are ignored with a warning.
    fn with_prop(self, prop: Prop, value: PropValue) -> Self;

    /// Attach a reconciliation key.
    fn with_key(self, key: impl Into<Key>) -> Self;

    /// Register a click handler.
    fn on_click(self, handler: impl Into<Handler>) -> Self;

    fn content(self, text: impl Into<String>) -> Self {
        self.with_prop(Prop::Text, PropValue::Text(text.into()))
    }

    /// Uniform padding on all four sides.
    fn padding(self, padding: u32) -> Self {
        self.padding_each(Spacing::all(padding))
    }

    fn padding_each(self, padding: Spacing) -> Self {
        self.with_prop(Prop::Padding, PropValue::Spacing(padding))
    }

    fn spacing(self, spacing: u32) -> Self {
        self.with_prop(Prop::Spacing, PropValue::Number(spacing))
    }

    fn font_size(self, size: u32) -> Self {
        self.with_prop(Prop::FontSize, PropValue::Number(size))
    }

    fn color(self, color: Color) -> Self {
        self.with_prop(Prop::Color, PropValue::Color(color))
    }

    fn background(self, color: Color) -> Self {
        self.with_prop(Prop::Background, PropValue::Color(color))
    }

    fn align(self, align: Alignment) -> Self {
        self.with_prop(Prop::Align, PropValue::Align(align))
    }

    fn fixed_width(self, width: u32) -> Self {
        self.with_prop(Prop::Width, PropValue::Number(width))
    }

    fn fixed_height(self, height: u32) -> Self {
        self.with_prop(Prop::Height, PropValue::Number(height))
    }

    fn fixed_size(self, width: u32, height: u32) -> Self {
        self.fixed_width(width).fixed_height(height)
    }

    fn checked(self, checked: bool) -> Self {
        self.with_prop(Prop::Checked, PropValue::Bool(checked))
    }

    /// The button "kind" option.
    fn variant(self, variant: Variant) -> Self {
        self.with_prop(Prop::Kind, PropValue::Variant(variant))
    }

    fn placeholder(self, text: impl Into<String>) -> Self {
        self.with_prop(Prop::Placeholder, PropValue::Text(text.into()))
    }

    fn value(self, text: impl Into<String>) -> Self {
        self.with_prop(Prop::Value, PropValue::Text(text.into()))
    }
}

impl Attributes for ViewNode {
    fn with_prop(mut self, prop: Prop, value: PropValue) -> Self {
        self.apply_prop(prop, value);
        self
    }

    fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.set_key(key.into());
        self
    }

    fn on_click(mut self, handler: impl Into<Handler>) -> Self {
        self.set_handler(handler.into());
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
