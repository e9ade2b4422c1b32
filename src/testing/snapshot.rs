//! Snapshot rendering helpers.
//!
//! Turn view trees, widget trees and patches into plain text for `insta`
//! snapshots and string assertions.

use std::fmt::Write as _;

use crate::reconcile::Patch;
use crate::render::{paint, Line, WidgetId, WidgetTree};
use crate::theme::Palette;
use crate::view::ViewNode;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Outline of a view tree, one node per line, children indented by two
/// spaces:
///
/// ```text
/// Column spacing=8
///   Text text="Count: 0"
///   Button #inc text="+" on_click
/// ```
pub fn tree_to_string(node: &ViewNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    trim_newline(out)
}

/// Outline of a widget tree in the same format as [`tree_to_string`], with
/// input edit buffers shown as `buffer="..."`. Handlers are not retained, so
/// never appear.
pub fn widgets_to_string(tree: &WidgetTree) -> String {
    let mut out = String::new();
    if let Some(root) = tree.root() {
        write_widget(&mut out, tree, root, 0);
    }
    trim_newline(out)
}

/// One patch operation per line.
pub fn patch_to_string(patch: &Patch) -> String {
    patch.to_string()
}

/// Paint a widget tree and keep only the text, right-trimmed.
pub fn paint_to_string(tree: &WidgetTree, palette: &Palette, focus: Option<WidgetId>, width: usize) -> String {
    lines_to_string(&paint(tree, palette, focus, width))
}

/// Join painted lines as plain text, right-trimmed.
pub fn lines_to_string(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|line| line.text().trim_end().to_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_node(out: &mut String, node: &ViewNode, depth: usize) {
    let _ = write!(out, "{:indent$}{}", "", node.kind(), indent = depth * 2);
    if let Some(key) = node.key() {
        let _ = write!(out, " #{key}");
    }
    for (prop, value) in node.props() {
        let _ = write!(out, " {prop}={value}");
    }
    if node.handler().is_some() {
        out.push_str(" on_click");
    }
    out.push('\n');
    for child in node.children() {
        write_node(out, child, depth + 1);
    }
}

fn write_widget(out: &mut String, tree: &WidgetTree, id: WidgetId, depth: usize) {
    let Some(widget) = tree.get(id) else {
        return;
    };
    let _ = write!(out, "{:indent$}{}", "", widget.kind, indent = depth * 2);
    if let Some(key) = &widget.key {
        let _ = write!(out, " #{key}");
    }
    for (prop, value) in &widget.props {
        let _ = write!(out, " {prop}={value}");
    }
    if widget.kind == crate::view::NodeKind::Input {
        let _ = write!(out, " buffer={:?}", widget.local.text);
    }
    out.push('\n');
    for &child in tree.children(id) {
        write_widget(out, tree, child, depth + 1);
    }
}

fn trim_newline(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
    }
    s
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::diff;
    use crate::theme::NORD;
    use crate::view::chained::{button, column, input, row, text};
    use crate::view::{Attributes, Handler};

    fn sample() -> ViewNode {
        column([
            text("Count: 0").font_size(24),
            row([button("-").with_key("dec").on_click(Handler::new(|| Ok(()))), button("+")]),
            input().placeholder("Name"),
        ])
        .spacing(8)
    }

    #[test]
    fn view_outline() {
        insta::assert_snapshot!(tree_to_string(&sample()), @r#"
        Column spacing=8
          Text text="Count: 0" font_size=24
          Row
            Button #dec text="-" on_click
            Button text="+"
          Input placeholder="Name"
        "#);
    }

    #[test]
    fn widget_outline_shows_buffer() {
        let mut tree = WidgetTree::new();
        tree.apply(&diff(None, &sample())).unwrap();
        let field = tree.resolve(&[0, 2]).unwrap();
        tree.insert_char(field, 'A');
        let outline = widgets_to_string(&tree);
        assert!(outline.ends_with(r#"  Input placeholder="Name" buffer="A""#));
        assert!(!outline.contains("on_click"));
    }

    #[test]
    fn painted_text() {
        let mut tree = WidgetTree::new();
        tree.apply(&diff(None, &sample())).unwrap();
        assert_eq!(
            paint_to_string(&tree, &NORD, None, 20),
            "Count: 0\n\n[ - ] [ + ]\n\n> Name"
        );
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(widgets_to_string(&WidgetTree::new()), "");
        assert_eq!(patch_to_string(&Patch::new()), "");
    }
}
