//! Counter: one state cell, two buttons. Written in the chained form.

use crate::app::AppConfig;
use crate::component::{Component, Scope, ViewResult};
use crate::reactive::State;
use crate::view::chained::{button, column, row, text};
use crate::view::{Attributes, Variant};

/// "Count: N" with "-" and "+" buttons.
pub struct Counter {
    count: State<i64>,
}

impl Counter {
    pub fn new(scope: &mut Scope) -> Self {
        Self {
            count: scope.state(0),
        }
    }

    /// Window settings the demo binary uses.
    pub fn window() -> AppConfig {
        AppConfig::new().with_title("Counter").with_size(300, 200)
    }

    pub fn count(&self) -> State<i64> {
        self.count
    }
}

impl Component for Counter {
    fn name(&self) -> &str {
        "Counter"
    }

    fn view(&self) -> ViewResult {
        let count = self.count.get()?;
        Ok(column([
            text(format!("Count: {count}")).font_size(24),
            row([
                button("-")
                    .variant(Variant::Danger)
                    .on_click(self.count.updater(|n| n - 1)),
                button("+")
                    .variant(Variant::Success)
                    .on_click(self.count.updater(|n| n + 1)),
            ])
            .spacing(8),
        ])
        .padding(16)
        .spacing(8))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
