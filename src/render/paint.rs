//! Paints a widget tree as styled text lines for the terminal host.
//!
//! This is a character-cell approximation, not a layout engine: columns stack
//! their children as lines, rows join theirs on one line, pixel-ish options
//! are scaled down (8 units per cell).

use super::retained::{WidgetId, WidgetTree};
use crate::theme::Palette;
use crate::view::{Alignment, Color, NodeKind, Prop, PropValue, Variant};

const UNITS_PER_CELL: u32 = 8;
const HEADING_SIZE: u32 = 20;

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub fg: Color,
    pub bg: Option<Color>,
    pub bold: bool,
    pub reverse: bool,
}

impl Span {
    fn plain(text: impl Into<String>, fg: Color) -> Self {
        Self { text: text.into(), fg, bg: None, bold: false, reverse: false }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// One terminal row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// Text content without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn indented(mut self, cells: usize) -> Self {
        if cells > 0 {
            self.spans.insert(0, Span::plain(" ".repeat(cells), Color::TRANSPARENT));
        }
        self
    }
}

/// Paint the whole tree, `width` cells wide.
pub fn paint(tree: &WidgetTree, palette: &Palette, focus: Option<WidgetId>, width: usize) -> Vec<Line> {
    let painter = Painter { tree, palette, focus };
    tree.root().map(|root| painter.block(root, width)).unwrap_or_default()
}

struct Painter<'a> {
    tree: &'a WidgetTree,
    palette: &'a Palette,
    focus: Option<WidgetId>,
}

impl Painter<'_> {
    fn number(&self, id: WidgetId, prop: Prop) -> u32 {
        self.tree
            .get(id)
            .and_then(|w| w.prop(prop))
            .and_then(PropValue::as_number)
            .unwrap_or(0)
    }

    fn block(&self, id: WidgetId, width: usize) -> Vec<Line> {
        let Some(widget) = self.tree.get(id) else {
            return Vec::new();
        };
        match widget.kind {
            NodeKind::Column | NodeKind::Container => {
                let indent = match widget.prop(Prop::Padding) {
                    Some(PropValue::Spacing(p)) => p.left.div_ceil(UNITS_PER_CELL) as usize,
                    _ => 0,
                };
                let gap = self.number(id, Prop::Spacing) >= UNITS_PER_CELL;
                let inner = width.saturating_sub(indent);
                let mut lines = Vec::new();
                for (i, &child) in self.tree.children(id).iter().enumerate() {
                    if gap && i > 0 {
                        lines.push(Line::default());
                    }
                    lines.extend(self.block(child, inner).into_iter().map(|l| l.indented(indent)));
                }
                lines
            }
            NodeKind::Divider => vec![Line {
                spans: vec![Span::plain("─".repeat(width), self.palette.surface)],
            }],
            NodeKind::Spacer => vec![Line::default()],
            _ => {
                let line = Line { spans: self.inline(id) };
                vec![self.align(id, line, width)]
            }
        }
    }

    fn align(&self, id: WidgetId, line: Line, width: usize) -> Line {
        let align = self
            .tree
            .get(id)
            .and_then(|w| match w.prop(Prop::Align) {
                Some(PropValue::Align(a)) => Some(*a),
                _ => None,
            })
            .unwrap_or_default();
        let free = width.saturating_sub(line.width());
        match align {
            Alignment::Left => line,
            Alignment::Center => line.indented(free / 2),
            Alignment::Right => line.indented(free),
        }
    }

    fn inline(&self, id: WidgetId) -> Vec<Span> {
        let Some(widget) = self.tree.get(id) else {
            return Vec::new();
        };
        let focused = self.focus == Some(id);
        let fg = match widget.prop(Prop::Color) {
            Some(PropValue::Color(c)) => *c,
            _ => self.palette.foreground,
        };
        let label = widget.text().unwrap_or_default();
        match widget.kind {
            NodeKind::Row | NodeKind::Column | NodeKind::Container => {
                let gap = self.number(id, Prop::Spacing).div_ceil(UNITS_PER_CELL).max(1) as usize;
                let mut spans = Vec::new();
                for (i, &child) in self.tree.children(id).iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::plain(" ".repeat(gap), fg));
                    }
                    spans.extend(self.inline(child));
                }
                spans
            }
            NodeKind::Text => {
                let mut span = Span::plain(label, fg);
                span.bold = self.number(id, Prop::FontSize) >= HEADING_SIZE;
                vec![span]
            }
            NodeKind::Button => {
                let variant = match widget.prop(Prop::Kind) {
                    Some(PropValue::Variant(v)) => *v,
                    _ => Variant::Normal,
                };
                let mut span = Span::plain(format!("[ {label} ]"), self.palette.variant_color(variant));
                span.reverse = focused;
                vec![span]
            }
            NodeKind::Checkbox => {
                let mark = if widget.is_checked() { 'x' } else { ' ' };
                let mut span = Span::plain(format!("[{mark}] {label}"), fg);
                span.reverse = focused;
                vec![span]
            }
            NodeKind::Input => {
                let local = &widget.local;
                let mut text = if local.text.is_empty() && !focused {
                    widget
                        .prop(Prop::Placeholder)
                        .and_then(PropValue::as_text)
                        .unwrap_or_default()
                        .to_owned()
                } else {
                    local.text.clone()
                };
                if focused {
                    let at = text.char_indices().nth(local.caret).map_or(text.len(), |(i, _)| i);
                    text.insert(at, '|');
                }
                let mut span = Span::plain(format!("> {text}"), fg);
                span.bg = Some(self.palette.surface);
                vec![span]
            }
            NodeKind::Spacer => vec![Span::plain(" ", fg)],
            NodeKind::Divider => vec![Span::plain("│", self.palette.surface)],
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::diff;
    use crate::theme::TOKYO_NIGHT;
    use crate::view::chained::{button, checkbox, column, divider, input, row, text};
    use crate::view::{Attributes, ViewNode};

    fn painted(tree: &ViewNode, focus_path: Option<&[usize]>) -> Vec<String> {
        let mut widgets = WidgetTree::new();
        widgets.apply(&diff(None, tree)).unwrap();
        let focus = focus_path.and_then(|p| widgets.resolve(p));
        paint(&widgets, &TOKYO_NIGHT, focus, 20)
            .iter()
            .map(Line::text)
            .collect()
    }

    #[test]
    fn column_stacks_and_row_joins() {
        let tree = column([
            text("Count: 0"),
            row([button("-"), button("+")]).spacing(8),
            divider(),
            checkbox("Dark").checked(true),
        ]);
        insta::assert_snapshot!(painted(&tree, None).join("\n"), @r"
        Count: 0
        [ - ] [ + ]
        ────────────────────
        [x] Dark
        ");
    }

    #[test]
    fn spacing_and_padding() {
        let tree = column([text("a"), text("b")]).spacing(8).padding(16);
        assert_eq!(painted(&tree, None), vec!["  a", "", "  b"]);
    }

    #[test]
    fn center_alignment() {
        let tree = column([text("hi").align(Alignment::Center)]);
        assert_eq!(painted(&tree, None), vec!["         hi"]);
    }

    #[test]
    fn input_placeholder_and_caret() {
        let tree = column([input().placeholder("Name"), input().value("ab")]);
        assert_eq!(painted(&tree, None), vec!["> Name", "> ab"]);
        assert_eq!(painted(&tree, Some(&[0, 1][..])), vec!["> Name", "> ab|"]);
    }

    #[test]
    fn focused_button_is_reversed() {
        let mut widgets = WidgetTree::new();
        widgets.apply(&diff(None, &column([button("ok")]))).unwrap();
        let focus = widgets.resolve(&[0, 0]);
        let lines = paint(&widgets, &TOKYO_NIGHT, focus, 10);
        assert!(lines[0].spans[0].reverse);
        assert_eq!(lines[0].spans[0].fg, TOKYO_NIGHT.accent);
    }

    #[test]
    fn heading_is_bold() {
        let mut widgets = WidgetTree::new();
        widgets.apply(&diff(None, &text("Title").font_size(24))).unwrap();
        let lines = paint(&widgets, &TOKYO_NIGHT, None, 10);
        assert!(lines[0].spans[0].bold);
    }
}
