//! Patch: the edit script handed to the renderer.
//!
//! Paths address nodes from a virtual top-level container, so a component's
//! root is at `[0]`, its second child at `[0, 1]`, and so on. Operations must
//! be applied in order: removals come before insertions within a container,
//! and a parent's structural edits always precede edits inside its children.

use std::fmt;

use crate::view::{Prop, PropValue, ViewNode};

/// Errors applying a patch to a tree that doesn't match its source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("no node at {0:?}")]
    MissingNode(Vec<usize>),
    #[error("index {index} out of range for children of {parent:?}")]
    IndexOutOfRange { parent: Vec<usize>, index: usize },
}

// ---------------------------------------------------------------------------
// PropChange
// ---------------------------------------------------------------------------

/// One changed property. `value: None` means the property was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropChange {
    pub prop: Prop,
    pub value: Option<PropValue>,
}

impl fmt::Display for PropChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.prop, value),
            None => write!(f, "-{}", self.prop),
        }
    }
}

// ---------------------------------------------------------------------------
// PatchOp
// ---------------------------------------------------------------------------

/// A single edit.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    /// Insert `node` (with its whole subtree) as child `index` of `parent`.
    Insert {
        parent: Vec<usize>,
        index: usize,
        node: ViewNode,
    },
    /// Remove child `index` of `parent` (with its whole subtree).
    Remove { parent: Vec<usize>, index: usize },
    /// Change properties of the node at `path`; only changed ones are listed.
    Update { path: Vec<usize>, delta: Vec<PropChange> },
}

impl PatchOp {
    /// Full path of the node the operation targets.
    pub fn target(&self) -> Vec<usize> {
        match self {
            PatchOp::Insert { parent, index, .. } | PatchOp::Remove { parent, index } => {
                let mut path = parent.clone();
                path.push(*index);
                path
            }
            PatchOp::Update { path, .. } => path.clone(),
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, PatchOp::Insert { .. })
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, PatchOp::Remove { .. })
    }

    pub fn is_update(&self) -> bool {
        matches!(self, PatchOp::Update { .. })
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOp::Insert { parent, index, node } => {
                write!(f, "insert {parent:?} @{index} {}", node.kind())?;
                if let Some(text) = node.text() {
                    write!(f, " {text:?}")?;
                }
                Ok(())
            }
            PatchOp::Remove { parent, index } => write!(f, "remove {parent:?} @{index}"),
            PatchOp::Update { path, delta } => {
                write!(f, "update {path:?}")?;
                for change in delta {
                    write!(f, " {change}")?;
                }
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Ordered sequence of edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: PatchOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<PatchOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatchOp> {
        self.ops.iter()
    }

    pub fn insert_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_insert()).count()
    }

    pub fn remove_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_remove()).count()
    }

    pub fn update_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_update()).count()
    }

    /// Whether any operation targets `path` or a descendant of it.
    pub fn touches(&self, path: &[usize]) -> bool {
        self.ops.iter().any(|op| op.target().starts_with(path))
    }

    /// Apply to a list of top-level trees (the children of the virtual root).
    ///
    /// Handlers are not part of patches: an updated node keeps the handler it
    /// had before.
    pub fn apply(&self, roots: &mut Vec<ViewNode>) -> Result<(), ApplyError> {
        for op in &self.ops {
            match op {
                PatchOp::Insert { parent, index, node } => {
                    let siblings = children_at(roots, parent)?;
                    if *index > siblings.len() {
                        return Err(ApplyError::IndexOutOfRange { parent: parent.clone(), index: *index });
                    }
                    siblings.insert(*index, node.clone());
                }
                PatchOp::Remove { parent, index } => {
                    let siblings = children_at(roots, parent)?;
                    if *index >= siblings.len() {
                        return Err(ApplyError::IndexOutOfRange { parent: parent.clone(), index: *index });
                    }
                    siblings.remove(*index);
                }
                PatchOp::Update { path, delta } => {
                    let (last, parent) = path
                        .split_last()
                        .ok_or_else(|| ApplyError::MissingNode(path.clone()))?;
                    let node = children_at(roots, parent)?
                        .get_mut(*last)
                        .ok_or_else(|| ApplyError::MissingNode(path.clone()))?;
                    for change in delta {
                        node.replace_prop(change.prop, change.value.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a PatchOp;
    type IntoIter = std::slice::Iter<'a, PatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

/// Child list of the node at `parent` (`[]` = the top-level list).
fn children_at<'a>(
    roots: &'a mut Vec<ViewNode>,
    parent: &[usize],
) -> Result<&'a mut Vec<ViewNode>, ApplyError> {
    let mut current = roots;
    for (depth, &index) in parent.iter().enumerate() {
        current = current
            .get_mut(index)
            .ok_or_else(|| ApplyError::MissingNode(parent[..=depth].to_vec()))?
            .children_mut();
    }
    Ok(current)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::chained::{button, column, text};
    use crate::view::Attributes;
    use pretty_assertions::assert_eq;

    fn update(path: Vec<usize>, prop: Prop, value: PropValue) -> PatchOp {
        PatchOp::Update { path, delta: vec![PropChange { prop, value: Some(value) }] }
    }

    #[test]
    fn target_paths() {
        let insert = PatchOp::Insert { parent: vec![0], index: 2, node: text("x") };
        assert_eq!(insert.target(), vec![0, 2]);
        let remove = PatchOp::Remove { parent: vec![], index: 0 };
        assert_eq!(remove.target(), vec![0]);
    }

    #[test]
    fn counts_and_touches() {
        let mut patch = Patch::new();
        patch.push(PatchOp::Remove { parent: vec![0], index: 1 });
        patch.push(update(vec![0, 0], Prop::Text, PropValue::Text("b".into())));
        assert_eq!(patch.remove_count(), 1);
        assert_eq!(patch.update_count(), 1);
        assert_eq!(patch.insert_count(), 0);
        assert!(patch.touches(&[0]));
        assert!(patch.touches(&[0, 0]));
        assert!(!patch.touches(&[0, 2]));
    }

    #[test]
    fn apply_edits_tree() {
        let mut roots = vec![column([text("a"), button("b")])];
        let mut patch = Patch::new();
        patch.push(PatchOp::Remove { parent: vec![0], index: 1 });
        patch.push(PatchOp::Insert { parent: vec![0], index: 0, node: text("z") });
        patch.push(update(vec![0, 1], Prop::FontSize, PropValue::Number(20)));
        patch.apply(&mut roots).unwrap();
        assert_eq!(roots, vec![column([text("z"), text("a").font_size(20)])]);
    }

    #[test]
    fn apply_removes_props() {
        let mut roots = vec![text("a").font_size(12)];
        let mut patch = Patch::new();
        patch.push(PatchOp::Update {
            path: vec![0],
            delta: vec![PropChange { prop: Prop::FontSize, value: None }],
        });
        patch.apply(&mut roots).unwrap();
        assert_eq!(roots, vec![text("a")]);
    }

    #[test]
    fn apply_rejects_bad_paths() {
        let mut roots = vec![column([])];
        let mut patch = Patch::new();
        patch.push(PatchOp::Remove { parent: vec![0], index: 0 });
        assert_eq!(
            patch.apply(&mut roots),
            Err(ApplyError::IndexOutOfRange { parent: vec![0], index: 0 })
        );
        let mut patch = Patch::new();
        patch.push(PatchOp::Insert { parent: vec![3], index: 0, node: text("x") });
        assert_eq!(patch.apply(&mut roots), Err(ApplyError::MissingNode(vec![3])));
    }

    #[test]
    fn display_lines() {
        let mut patch = Patch::new();
        patch.push(PatchOp::Insert { parent: vec![], index: 0, node: text("Count: 0") });
        patch.push(PatchOp::Remove { parent: vec![0], index: 3 });
        patch.push(update(vec![0, 0], Prop::Text, PropValue::Text("Count: 1".into())));
        insta::assert_snapshot!(patch.to_string(), @r#"
        insert [] @0 Text "Count: 0"
        remove [0] @3
        update [0, 0] text="Count: 1"
        "#);
    }
}
