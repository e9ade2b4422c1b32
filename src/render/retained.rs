//! Retained widget tree: the materialized side of reconciliation.
//!
//! Patches are applied to a slotmap arena. A widget matched across renders is
//! only ever updated in place, so its [`WidgetId`] and local state (the edit
//! buffer and caret of an input) survive; removed widgets are dropped with
//! their subtrees.

use std::collections::{BTreeMap, VecDeque};

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::reconcile::{ApplyError, Patch, PatchOp, PropChange};
use crate::view::{Key, NodeKind, Prop, PropValue, ViewNode};

new_key_type! {
    /// Identifies a materialized widget.
    pub struct WidgetId;
}

const EMPTY_CHILDREN: &[WidgetId] = &[];

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Widget-local state the view tree doesn't describe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalState {
    /// Input edit buffer.
    pub text: String,
    /// Caret position in chars within `text`.
    pub caret: usize,
}

/// One materialized node.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub kind: NodeKind,
    pub key: Option<Key>,
    pub props: BTreeMap<Prop, PropValue>,
    pub local: LocalState,
}

impl Widget {
    fn from_node(node: &ViewNode) -> Self {
        let mut widget = Self {
            kind: node.kind(),
            key: node.key().cloned(),
            props: node.props().clone(),
            local: LocalState::default(),
        };
        widget.reset_input();
        widget
    }

    pub fn prop(&self, prop: Prop) -> Option<&PropValue> {
        self.props.get(&prop)
    }

    pub fn text(&self) -> Option<&str> {
        self.prop(Prop::Text).and_then(PropValue::as_text)
    }

    pub fn is_checked(&self) -> bool {
        self.prop(Prop::Checked).and_then(PropValue::as_bool).unwrap_or(false)
    }

    fn apply_delta(&mut self, delta: &[PropChange]) {
        let mut value_changed = false;
        for change in delta {
            value_changed |= change.prop == Prop::Value;
            match &change.value {
                Some(value) => {
                    self.props.insert(change.prop, value.clone());
                }
                None => {
                    self.props.remove(&change.prop);
                }
            }
        }
        if value_changed {
            self.reset_input();
        }
    }

    /// Seed the edit buffer from the `value` option.
    fn reset_input(&mut self) {
        if self.kind == NodeKind::Input {
            self.local.text = self
                .prop(Prop::Value)
                .and_then(PropValue::as_text)
                .unwrap_or_default()
                .to_owned();
            self.local.caret = self.local.text.chars().count();
        }
    }
}

// ---------------------------------------------------------------------------
// WidgetTree
// ---------------------------------------------------------------------------

/// The materialized tree of one component.
///
/// Top-level widgets hang off a virtual container, matching patch paths: the
/// component root is `[0]`.
#[derive(Debug, Default)]
pub struct WidgetTree {
    widgets: SlotMap<WidgetId, Widget>,
    children: SecondaryMap<WidgetId, Vec<WidgetId>>,
    parent: SecondaryMap<WidgetId, WidgetId>,
    roots: Vec<WidgetId>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a patch in order. Stops at the first operation that doesn't fit
    /// the current tree.
    pub fn apply(&mut self, patch: &Patch) -> Result<(), ApplyError> {
        for op in patch {
            match op {
                PatchOp::Insert { parent, index, node } => {
                    let parent_id = self.resolve_parent(parent)?;
                    let len = self.child_list(parent_id).len();
                    if *index > len {
                        return Err(ApplyError::IndexOutOfRange { parent: parent.clone(), index: *index });
                    }
                    let id = self.build(node, parent_id);
                    self.child_list_mut(parent_id).insert(*index, id);
                }
                PatchOp::Remove { parent, index } => {
                    let parent_id = self.resolve_parent(parent)?;
                    let siblings = self.child_list_mut(parent_id);
                    if *index >= siblings.len() {
                        return Err(ApplyError::IndexOutOfRange { parent: parent.clone(), index: *index });
                    }
                    let id = siblings.remove(*index);
                    self.drop_subtree(id);
                }
                PatchOp::Update { path, delta } => {
                    let id = self
                        .resolve(path)
                        .ok_or_else(|| ApplyError::MissingNode(path.clone()))?;
                    if let Some(widget) = self.widgets.get_mut(id) {
                        widget.apply_delta(delta);
                    }
                }
            }
        }
        Ok(())
    }

    /// `None` stands for the virtual top-level container.
    fn resolve_parent(&self, parent: &[usize]) -> Result<Option<WidgetId>, ApplyError> {
        if parent.is_empty() {
            return Ok(None);
        }
        self.resolve(parent)
            .map(Some)
            .ok_or_else(|| ApplyError::MissingNode(parent.to_vec()))
    }

    fn child_list(&self, parent: Option<WidgetId>) -> &[WidgetId] {
        match parent {
            None => &self.roots,
            Some(id) => self.children(id),
        }
    }

    fn child_list_mut(&mut self, parent: Option<WidgetId>) -> &mut Vec<WidgetId> {
        match parent {
            None => &mut self.roots,
            Some(id) => {
                if !self.children.contains_key(id) {
                    self.children.insert(id, Vec::new());
                }
                // Present: inserted above, and `id` came from `resolve`.
                match self.children.get_mut(id) {
                    Some(list) => list,
                    None => &mut self.roots,
                }
            }
        }
    }

    fn build(&mut self, node: &ViewNode, parent: Option<WidgetId>) -> WidgetId {
        let id = self.widgets.insert(Widget::from_node(node));
        if let Some(parent) = parent {
            self.parent.insert(id, parent);
        }
        let kids: Vec<WidgetId> = node
            .children()
            .iter()
            .map(|child| self.build(child, Some(id)))
            .collect();
        self.children.insert(id, kids);
        id
    }

    fn drop_subtree(&mut self, id: WidgetId) {
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            self.widgets.remove(current);
        }
    }

    // -- Queries -------------------------------------------------------------

    /// Widget at an absolute path (`[0]` is the root).
    pub fn resolve(&self, path: &[usize]) -> Option<WidgetId> {
        let (first, rest) = path.split_first()?;
        let mut current = *self.roots.get(*first)?;
        for &index in rest {
            current = *self.children(current).get(index)?;
        }
        Some(current)
    }

    /// Absolute path of a widget.
    pub fn path_of(&self, id: WidgetId) -> Option<Vec<usize>> {
        if !self.widgets.contains_key(id) {
            return None;
        }
        let mut path = Vec::new();
        let mut current = id;
        while let Some(&parent) = self.parent.get(current) {
            path.push(self.children(parent).iter().position(|&c| c == current)?);
            current = parent;
        }
        path.push(self.roots.iter().position(|&r| r == current)?);
        path.reverse();
        Some(path)
    }

    pub fn root(&self) -> Option<WidgetId> {
        self.roots.first().copied()
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id)
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(EMPTY_CHILDREN)
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.parent.get(id).copied()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Pre-order depth-first traversal of the whole tree.
    pub fn walk_depth_first(&self) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut stack: Vec<WidgetId> = self.roots.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        result
    }

    /// Widgets that take focus (buttons, checkboxes, inputs), in document order.
    pub fn focusable(&self) -> Vec<WidgetId> {
        self.walk_depth_first()
            .into_iter()
            .filter(|&id| {
                self.get(id).is_some_and(|w| {
                    matches!(w.kind, NodeKind::Button | NodeKind::Checkbox | NodeKind::Input)
                })
            })
            .collect()
    }

    /// Rebuild a view tree from the widgets (handlers are not retained).
    pub fn to_view(&self, id: WidgetId) -> Option<ViewNode> {
        let widget = self.get(id)?;
        let mut node = ViewNode::new(widget.kind);
        for (prop, value) in &widget.props {
            node.replace_prop(*prop, Some(value.clone()));
        }
        if let Some(key) = &widget.key {
            node.set_key(key.clone());
        }
        for &child in self.children(id) {
            let child = self.to_view(child)?;
            node.children_mut().push(child);
        }
        Some(node)
    }

    // -- Local input state -----------------------------------------------------

    /// Insert a char at the caret of an input.
    pub fn insert_char(&mut self, id: WidgetId, c: char) -> bool {
        let Some(local) = self.input_state(id) else {
            return false;
        };
        let at = byte_offset(&local.text, local.caret);
        local.text.insert(at, c);
        local.caret += 1;
        true
    }

    /// Delete the char before the caret of an input.
    pub fn delete_back(&mut self, id: WidgetId) -> bool {
        let Some(local) = self.input_state(id) else {
            return false;
        };
        if local.caret == 0 {
            return false;
        }
        let at = byte_offset(&local.text, local.caret - 1);
        local.text.remove(at);
        local.caret -= 1;
        true
    }

    /// Move an input's caret by `delta` chars, clamped to the text.
    pub fn move_caret(&mut self, id: WidgetId, delta: isize) -> bool {
        let Some(local) = self.input_state(id) else {
            return false;
        };
        let len = local.text.chars().count();
        local.caret = local.caret.saturating_add_signed(delta).min(len);
        true
    }

    fn input_state(&mut self, id: WidgetId) -> Option<&mut LocalState> {
        self.widgets
            .get_mut(id)
            .filter(|w| w.kind == NodeKind::Input)
            .map(|w| &mut w.local)
    }
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

// ===========================================================================
// Tests
// ===========================================================================
