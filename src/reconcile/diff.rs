//! Tree diff.
//!
//! Children of each container are matched in two passes: explicitly keyed
//! nodes by key, then unkeyed nodes by their original position in the old
//! list. Keyed matches whose relative order survives (the longest increasing
//! run of old indices) are kept first; unkeyed matches are kept only where
//! they fit between their kept keyed neighbours. Kept pairs are recursed
//! into and every other node is removed or inserted, so a keyed node is only
//! recreated when it swaps places with another keyed node.

use std::collections::HashMap;

use super::patch::{Patch, PatchOp, PropChange};
use crate::view::{Key, NodeKind, ViewNode};

/// An in-place change the reconciler could not express as an update.
///
/// Never fatal: the node is replaced by a Remove + Insert pair and the error
/// is reported next to the patch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("node at {path:?} changed kind from {old} to {new}; replacing subtree")]
    KindChanged {
        path: Vec<usize>,
        old: NodeKind,
        new: NodeKind,
    },
    #[error("node at {path:?} changed key; replacing subtree")]
    KeyChanged { path: Vec<usize> },
}

impl ReconcileError {
    pub fn path(&self) -> &[usize] {
        match self {
            ReconcileError::KindChanged { path, .. } | ReconcileError::KeyChanged { path } => path,
        }
    }
}

/// A patch plus the fallbacks taken while computing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff {
    pub patch: Patch,
    pub fallbacks: Vec<ReconcileError>,
}

/// Edit script turning `old` into `new`. `None` means nothing is displayed
/// yet, producing a single Insert of the whole tree.
pub fn diff(old: Option<&ViewNode>, new: &ViewNode) -> Patch {
    diff_report(old, new).patch
}

/// Like [`diff`], also returning the subtree replacements that were forced.
pub fn diff_report(old: Option<&ViewNode>, new: &ViewNode) -> Diff {
    let old_roots = old.map(std::slice::from_ref).unwrap_or(&[]);
    let mut differ = Differ::default();
    differ.children(&mut Vec::new(), old_roots, std::slice::from_ref(new));
    for fallback in &differ.fallbacks {
        tracing::debug!(%fallback, "reconcile fallback");
    }
    Diff {
        patch: differ.patch,
        fallbacks: differ.fallbacks,
    }
}

/// Patch removing a displayed tree entirely.
pub fn removal() -> Patch {
    let mut patch = Patch::new();
    patch.push(PatchOp::Remove { parent: Vec::new(), index: 0 });
    patch
}

/// Properties of `new` that differ from `old`, in property order.
pub fn diff_props(old: &ViewNode, new: &ViewNode) -> Vec<PropChange> {
    let mut delta = Vec::new();
    for (prop, value) in new.props() {
        if old.prop(*prop) != Some(value) {
            delta.push(PropChange { prop: *prop, value: Some(value.clone()) });
        }
    }
    for prop in old.props().keys() {
        if new.prop(*prop).is_none() {
            delta.push(PropChange { prop: *prop, value: None });
        }
    }
    delta.sort_by_key(|change| change.prop);
    delta
}

// ---------------------------------------------------------------------------
// Differ
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Differ {
    patch: Patch,
    fallbacks: Vec<ReconcileError>,
}

impl Differ {
    fn node(&mut self, path: &mut Vec<usize>, old: &ViewNode, new: &ViewNode) {
        let delta = diff_props(old, new);
        if !delta.is_empty() {
            self.patch.push(PatchOp::Update { path: path.clone(), delta });
        }
        self.children(path, old.children(), new.children());
    }

    fn children(&mut self, parent: &mut Vec<usize>, old: &[ViewNode], new: &[ViewNode]) {
        let matches = match_children(old, new);
        let kept = keep_in_order(new, &matches);

        let mut old_kept = vec![false; old.len()];
        for &i in kept.iter().flatten() {
            old_kept[i] = true;
        }
        let mut old_matched = vec![false; old.len()];
        for &i in matches.iter().flatten() {
            old_matched[i] = true;
        }
        let moved = matches.iter().flatten().count() - kept.iter().flatten().count();
        if moved > 0 {
            tracing::trace!(?parent, moved, "reordered children replaced");
        }

        // Only a slot whose old and new occupants both went unmatched changed
        // in place; matched nodes that merely moved are not fallbacks.
        for (j, node) in new.iter().enumerate() {
            if matches[j].is_some() || j >= old.len() || old_matched[j] {
                continue;
            }
            let mut path = parent.clone();
            path.push(j);
            let prev = &old[j];
            if prev.kind() != node.kind() {
                self.fallbacks.push(ReconcileError::KindChanged {
                    path,
                    old: prev.kind(),
                    new: node.kind(),
                });
            } else if prev.key() != node.key() {
                self.fallbacks.push(ReconcileError::KeyChanged { path });
            }
        }

        for i in (0..old.len()).rev() {
            if !old_kept[i] {
                self.patch.push(PatchOp::Remove { parent: parent.clone(), index: i });
            }
        }
        for (j, node) in new.iter().enumerate() {
            if kept[j].is_none() {
                self.patch.push(PatchOp::Insert {
                    parent: parent.clone(),
                    index: j,
                    node: node.clone(),
                });
            }
        }
        for (j, node) in new.iter().enumerate() {
            if let Some(i) = kept[j] {
                parent.push(j);
                self.node(parent, &old[i], node);
                parent.pop();
            }
        }
    }
}

/// For each new child, the old child it matches (if any).
fn match_children(old: &[ViewNode], new: &[ViewNode]) -> Vec<Option<usize>> {
    let mut used = vec![false; old.len()];
    let mut matches = vec![None; new.len()];

    let mut by_key: HashMap<&Key, usize> = HashMap::new();
    for (i, node) in old.iter().enumerate() {
        if let Some(key) = node.key() {
            by_key.entry(key).or_insert(i);
        }
    }
    for (j, node) in new.iter().enumerate() {
        let Some(key) = node.key() else { continue };
        if let Some(&i) = by_key.get(key) {
            if !used[i] && old[i].kind() == node.kind() {
                used[i] = true;
                matches[j] = Some(i);
            }
        }
    }

    for (j, node) in new.iter().enumerate() {
        if node.key().is_some() {
            continue;
        }
        if let Some(prev) = old.get(j) {
            if !used[j] && prev.key().is_none() && prev.kind() == node.kind() {
                used[j] = true;
                matches[j] = Some(j);
            }
        }
    }
    matches
}

/// Which matches are kept in place, indexed by new position.
///
/// Keyed matches take precedence: the longest run of them in old order is
/// kept. An unkeyed match (always `i == j`) is kept when its old index lies
/// strictly between the old indices of the nearest kept keyed nodes before
/// and after it, so the kept set stays increasing in old order.
fn keep_in_order(new: &[ViewNode], matches: &[Option<usize>]) -> Vec<Option<usize>> {
    let keyed: Vec<(usize, usize)> = matches
        .iter()
        .enumerate()
        .filter(|&(j, _)| new[j].key().is_some())
        .filter_map(|(j, m)| m.map(|i| (j, i)))
        .collect();
    let old_order: Vec<usize> = keyed.iter().map(|&(_, i)| i).collect();
    let mut kept: Vec<Option<usize>> = vec![None; new.len()];
    for pos in longest_increasing(&old_order) {
        let (j, i) = keyed[pos];
        kept[j] = Some(i);
    }

    let mut lower = vec![None; new.len()];
    let mut last = None;
    for j in 0..new.len() {
        lower[j] = last;
        if kept[j].is_some() {
            last = kept[j];
        }
    }
    let mut upper = vec![None; new.len()];
    let mut next = None;
    for j in (0..new.len()).rev() {
        upper[j] = next;
        if kept[j].is_some() {
            next = kept[j];
        }
    }

    for (j, m) in matches.iter().enumerate() {
        let Some(i) = *m else { continue };
        if new[j].key().is_some() {
            continue;
        }
        if lower[j].is_none_or(|l| l < i) && upper[j].is_none_or(|u| i < u) {
            kept[j] = Some(i);
        }
    }
    kept
}

/// Positions in `seq` forming one longest strictly increasing subsequence.
fn longest_increasing(seq: &[usize]) -> Vec<usize> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];
    for (pos, &value) in seq.iter().enumerate() {
        let slot = tails.partition_point(|&t| seq[t] < value);
        if slot > 0 {
            prev[pos] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(pos);
        } else {
            tails[slot] = pos;
        }
    }
    let mut out = Vec::with_capacity(tails.len());
    let mut cur = tails.last().copied();
    while let Some(pos) = cur {
        out.push(pos);
        cur = prev[pos];
    }
    out.reverse();
    out
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::chained::{button, column, input, row, text};
    use crate::view::{Attributes, Prop, PropValue};
    use pretty_assertions::assert_eq;

    fn applied(old: &ViewNode, new: &ViewNode) -> ViewNode {
        let mut roots = vec![old.clone()];
        diff(Some(old), new).apply(&mut roots).unwrap();
        assert_eq!(roots.len(), 1);
        roots.remove(0)
    }

    #[test]
    fn first_render_is_single_insert() {
        let tree = column([text("a")]);
        let patch = diff(None, &tree);
        assert_eq!(
            patch.ops(),
            &[PatchOp::Insert { parent: vec![], index: 0, node: tree.clone() }]
        );
    }

    #[test]
    fn identical_trees_give_empty_patch() {
        let tree = column([text("a"), row([button("-"), button("+")]).spacing(8)]).padding(16);
        assert!(diff(Some(&tree), &tree.clone()).is_empty());
    }

    #[test]
    fn text_change_is_single_update() {
        let old = column([text("Count: 0"), row([button("-"), button("+")])]);
        let new = column([text("Count: 1"), row([button("-"), button("+")])]);
        let patch = diff(Some(&old), &new);
        assert_eq!(
            patch.ops(),
            &[PatchOp::Update {
                path: vec![0, 0],
                delta: vec![PropChange { prop: Prop::Text, value: Some(PropValue::Text("Count: 1".into())) }],
            }]
        );
    }

    #[test]
    fn removed_prop_is_reported() {
        let old = text("a").font_size(20);
        let new = text("a");
        let delta = diff_props(&old, &new);
        assert_eq!(delta, vec![PropChange { prop: Prop::FontSize, value: None }]);
    }

    #[test]
    fn appended_child_is_insert() {
        let old = column([text("a")]);
        let new = column([text("a"), text("b")]);
        let patch = diff(Some(&old), &new);
        assert_eq!(
            patch.ops(),
            &[PatchOp::Insert { parent: vec![0], index: 1, node: text("b") }]
        );
    }

    #[test]
    fn removals_run_in_reverse_order() {
        let old = column([text("a"), button("b"), text("c"), button("d")]);
        let new = column([text("a")]);
        let patch = diff(Some(&old), &new);
        assert_eq!(
            patch.ops(),
            &[
                PatchOp::Remove { parent: vec![0], index: 3 },
                PatchOp::Remove { parent: vec![0], index: 2 },
                PatchOp::Remove { parent: vec![0], index: 1 },
            ]
        );
        assert_eq!(applied(&old, &new), new);
    }

    #[test]
    fn unkeyed_match_uses_original_index() {
        // Removing the first child shifts the rest; positional matching
        // compares each new child with the old child at the same index.
        let old = column([text("a"), text("b"), text("c")]);
        let new = column([text("b"), text("c")]);
        let patch = diff(Some(&old), &new);
        assert_eq!(patch.remove_count(), 1);
        assert_eq!(patch.update_count(), 2);
        assert_eq!(applied(&old, &new), new);
    }

    #[test]
    fn kind_change_falls_back_to_replace() {
        let old = column([text("a")]);
        let new = column([button("a")]);
        let report = diff_report(Some(&old), &new);
        assert_eq!(
            report.patch.ops(),
            &[
                PatchOp::Remove { parent: vec![0], index: 0 },
                PatchOp::Insert { parent: vec![0], index: 0, node: button("a") },
            ]
        );
        assert_eq!(
            report.fallbacks,
            vec![ReconcileError::KindChanged {
                path: vec![0, 0],
                old: NodeKind::Text,
                new: NodeKind::Button,
            }]
        );
    }

    #[test]
    fn root_kind_change_replaces_root() {
        let old = column([]);
        let new = row([]);
        let report = diff_report(Some(&old), &new);
        assert_eq!(report.patch.len(), 2);
        assert_eq!(report.fallbacks[0].path(), &[0]);
    }

    #[test]
    fn key_change_is_reported() {
        let old = column([text("a").with_key("x")]);
        let new = column([text("a").with_key("y")]);
        let report = diff_report(Some(&old), &new);
        assert_eq!(report.fallbacks, vec![ReconcileError::KeyChanged { path: vec![0, 0] }]);
        assert_eq!(report.patch.remove_count(), 1);
        assert_eq!(report.patch.insert_count(), 1);
    }

    #[test]
    fn keyed_node_survives_sibling_removal() {
        let old = column([text("hint"), input().with_key("name"), button("Save")]);
        let new = column([input().with_key("name"), button("Save")]);
        let patch = diff(Some(&old), &new);
        // The input is neither removed nor reinserted; only its siblings are.
        assert_eq!(
            patch.ops(),
            &[
                PatchOp::Remove { parent: vec![0], index: 2 },
                PatchOp::Remove { parent: vec![0], index: 0 },
                PatchOp::Insert { parent: vec![0], index: 1, node: button("Save") },
            ]
        );
        assert_eq!(applied(&old, &new), new);
    }

    #[test]
    fn keyed_reorder_keeps_longest_run() {
        let old = column([text("a").with_key("a"), text("b").with_key("b"), text("c").with_key("c")]);
        let new = column([text("c").with_key("c"), text("a").with_key("a"), text("b").with_key("b")]);
        let report = diff_report(Some(&old), &new);
        // With no move op, c crossing both a and b is the one recreated.
        assert_eq!(
            report.patch.ops(),
            &[
                PatchOp::Remove { parent: vec![0], index: 2 },
                PatchOp::Insert { parent: vec![0], index: 0, node: text("c").with_key("c") },
            ]
        );
        assert!(report.fallbacks.is_empty());
        assert_eq!(applied(&old, &new), new);
    }

    #[test]
    fn keyed_node_outranks_unkeyed_siblings() {
        let old = column([text("a"), text("b"), input().with_key("k")]);
        let new = column([input().with_key("k"), text("b"), text("a")]);
        let report = diff_report(Some(&old), &new);
        assert_eq!(
            report.patch.ops(),
            &[
                PatchOp::Remove { parent: vec![0], index: 1 },
                PatchOp::Remove { parent: vec![0], index: 0 },
                PatchOp::Insert { parent: vec![0], index: 1, node: text("b") },
                PatchOp::Insert { parent: vec![0], index: 2, node: text("a") },
            ]
        );
        assert!(report.fallbacks.is_empty());
        assert_eq!(applied(&old, &new), new);
    }

    #[test]
    fn keyed_reversal_reports_no_fallbacks() {
        let keyed = |keys: &[&str]| column(keys.iter().map(|k| text(*k).with_key(*k)));
        let old = keyed(&["a", "b", "c", "d"]);
        let new = keyed(&["d", "c", "b", "a"]);
        let report = diff_report(Some(&old), &new);
        assert_eq!(report.fallbacks, vec![]);
        assert_eq!(report.patch.remove_count(), 3);
        assert_eq!(applied(&old, &new), new);
    }

    #[test]
    fn unkeyed_match_between_keyed_neighbours_is_kept() {
        let old = column([text("a").with_key("a"), text("mid"), text("b").with_key("b")]);
        let new = column([text("a").with_key("a"), text("mid2"), text("b").with_key("b")]);
        let patch = diff(Some(&old), &new);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.update_count(), 1);
        assert_eq!(applied(&old, &new), new);
    }

    #[test]
    fn nested_updates_follow_parent_edits() {
        let old = column([row([text("x")]), text("y")]);
        let new = column([row([text("x2")]), text("y"), text("new")]);
        let patch = diff(Some(&old), &new);
        assert_eq!(applied(&old, &new), new);
        assert!(patch.ops()[0].is_insert());
        assert_eq!(patch.ops().last().map(PatchOp::target), Some(vec![0, 0, 0]));
    }

    #[test]
    fn lis_positions() {
        assert_eq!(longest_increasing(&[]), Vec::<usize>::new());
        assert_eq!(longest_increasing(&[2, 0, 1]), vec![1, 2]);
        assert_eq!(longest_increasing(&[0, 1, 2]), vec![0, 1, 2]);
        assert_eq!(longest_increasing(&[3, 1, 2, 0, 4]).len(), 3);
    }

    #[test]
    fn removal_targets_root() {
        assert_eq!(removal().ops(), &[PatchOp::Remove { parent: vec![], index: 0 }]);
    }
}
