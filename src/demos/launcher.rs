//! Launcher: lists the demos; selecting one records it.

use crate::app::AppConfig;
use crate::component::{Component, Scope, ViewResult};
use crate::reactive::State;
use crate::view::chained::{button, column, text};
use crate::view::{Alignment, Attributes};

use super::DEMOS;

pub struct Launcher {
    selected: State<Option<&'static str>>,
}

impl Launcher {
    pub fn new(scope: &mut Scope) -> Self {
        Self {
            selected: scope.state(None),
        }
    }

    pub fn window() -> AppConfig {
        AppConfig::new().with_title("Kumiki Launcher").with_size(400, 300)
    }

    /// The demo picked so far.
    pub fn selected(&self) -> State<Option<&'static str>> {
        self.selected
    }
}

impl Component for Launcher {
    fn name(&self) -> &str {
        "Launcher"
    }

    fn view(&self) -> ViewResult {
        let selected = self.selected.get()?.unwrap_or("none");
        let entries = DEMOS.iter().map(|&name| {
            button(name)
                .with_key(name)
                .fixed_width(200)
                .on_click(self.selected.setter(Some(name)))
        });
        Ok(column([
            text("Kumiki demos").font_size(24).align(Alignment::Center),
            text(format!("Selected: {selected}")),
            column(entries).spacing(4),
        ])
        .padding(16)
        .spacing(8))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
