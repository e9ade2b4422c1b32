//! Property tests over the public API: coalescing across random write
//! sequences, and equivalence of the two builder forms.

use std::cell::Cell;
use std::rc::Rc;

use kumiki_core::prelude::*;
use kumiki_core::reconcile::diff;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Coalescing
// ---------------------------------------------------------------------------

struct Pair {
    a: State<i32>,
    b: State<i32>,
    views: Rc<Cell<usize>>,
}

impl Component for Pair {
    fn name(&self) -> &str {
        "Pair"
    }

    fn view(&self) -> ViewResult {
        self.views.set(self.views.get() + 1);
        Ok(row([text(format!("{}", self.a.get()?)), text(format!("{}", self.b.get()?))]))
    }
}

#[derive(Debug, Clone)]
enum Step {
    SetA(i32),
    SetB(i32),
    Tick,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (-2i32..3).prop_map(Step::SetA),
        (-2i32..3).prop_map(Step::SetB),
        Just(Step::Tick),
    ]
}

proptest! {
    #[test]
    fn test_at_most_one_view_per_tick(steps in prop::collection::vec(step(), 0..40)) {
        let mut app = App::new(AppConfig::default());
        let views = Rc::new(Cell::new(0));
        let counter = Rc::clone(&views);
        let mut cells = None;
        let id = app.mount(|scope| {
            let (a, b) = (scope.state(0), scope.state(0));
            cells = Some((a, b));
            Pair { a, b, views: counter }
        });
        let (a, b) = cells.unwrap();
        app.tick();

        let mut shown = (0, 0);
        for step in steps {
            match step {
                Step::SetA(v) => { a.set(v).unwrap(); }
                Step::SetB(v) => { b.set(v).unwrap(); }
                Step::Tick => {
                    let before = views.get();
                    let report = app.tick();
                    let current = (a.get().unwrap(), b.get().unwrap());
                    prop_assert!(report.render_count(id) <= 1);
                    prop_assert_eq!(views.get() - before, report.render_count(id));
                    // A render happens exactly when something visible changed.
                    prop_assert_eq!(report.frame(id).is_some(), current != shown);
                    shown = current;
                }
            }
        }

        app.tick();
        let tree = app.registry().last_tree(id).unwrap();
        let expected = row([
            text(format!("{}", a.get().unwrap())),
            text(format!("{}", b.get().unwrap())),
        ]);
        prop_assert!(diff(Some(tree), &expected).is_empty());
    }
}

// ---------------------------------------------------------------------------
// Builder equivalence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Entry {
    label: String,
    size: u32,
    variant: u8,
    checked: Option<bool>,
}

fn entry() -> impl Strategy<Value = Entry> {
    ("[a-z]{1,6}", 8u32..32, 0u8..5, proptest::option::of(any::<bool>()))
        .prop_map(|(label, size, variant, checked)| Entry { label, size, variant, checked })
}

fn chained(entries: &[Entry], spacing: u32) -> ViewNode {
    column(entries.iter().map(|e| match e.checked {
        Some(c) => checkbox(e.label.clone()).checked(c).font_size(e.size),
        None => button(e.label.clone())
            .font_size(e.size)
            .variant(Variant::ALL[e.variant as usize]),
    }))
    .spacing(spacing)
}

fn nested_form(entries: &[Entry], spacing: u32) -> ViewNode {
    nested::column(Options::new().spacing(spacing), |ui| {
        for e in entries {
            match e.checked {
                Some(c) => {
                    ui.checkbox(e.label.clone()).checked(c).font_size(e.size);
                }
                None => {
                    ui.button(e.label.clone())
                        .font_size(e.size)
                        .variant(Variant::ALL[e.variant as usize]);
                }
            }
        }
    })
}

proptest! {
    #[test]
    fn test_builder_forms_agree(entries in prop::collection::vec(entry(), 0..8), spacing in 0u32..16) {
        let a = chained(&entries, spacing);
        let b = nested_form(&entries, spacing);
        prop_assert!(diff(Some(&a), &b).is_empty());
        prop_assert_eq!(a, b);
    }
}
