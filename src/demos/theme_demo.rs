//! Theme switcher and widget gallery. Written in the nested form.
//!
//! The header shows the component's own `theme_idx` cell, not the registry:
//! `view()` stays a function of state. A palette button writes the cell and
//! calls the registry setter from the same handler.

use std::rc::Rc;

use crate::app::AppConfig;
use crate::component::{Component, RenderError, Scope, ViewResult};
use crate::reactive::State;
use crate::theme::ThemeRegistry;
use crate::view::nested::{self, Options};
use crate::view::{Attributes, Capture, Handler, Variant};

pub struct ThemeDemo {
    themes: Rc<ThemeRegistry>,
    theme_idx: State<usize>,
    feature: State<bool>,
}

impl ThemeDemo {
    pub fn new(scope: &mut Scope, themes: Rc<ThemeRegistry>) -> Self {
        Self {
            theme_idx: scope.state(themes.current_index()),
            feature: scope.state(false),
            themes,
        }
    }

    pub fn window() -> AppConfig {
        AppConfig::new().with_title("Theme Demo").with_size(600, 400)
    }

    pub fn theme_idx(&self) -> State<usize> {
        self.theme_idx
    }

    /// Handler for a palette button: record the index, switch the registry.
    fn select(&self, index: usize) -> Handler {
        let theme_idx = self.theme_idx;
        let themes = Rc::clone(&self.themes);
        let capture = Capture::new(theme_idx.owner()).with_cell(theme_idx.index());
        Handler::with_capture(capture, move || {
            theme_idx.set(index)?;
            if let Err(err) = themes.set_current_index(index) {
                tracing::warn!(%err, "theme not switched");
            }
            Ok(())
        })
    }
}

impl Component for ThemeDemo {
    fn name(&self) -> &str {
        "ThemeDemo"
    }

    fn view(&self) -> ViewResult {
        let index = self.theme_idx.get()?;
        let current = self
            .themes
            .get(index)
            .ok_or_else(|| RenderError::Invalid(format!("no theme at index {index}")))?;
        let feature = self.feature.get()?;

        Ok(nested::column(Options::new().padding(16).spacing(8), |ui| {
            ui.text(format!("Theme: {}", current.name)).font_size(20);
            ui.row(Options::new().spacing(8), |ui| {
                for (i, palette) in self.themes.palettes().iter().enumerate() {
                    ui.button(palette.name).on_click(self.select(i));
                }
            });
            ui.divider();
            ui.row(Options::new().spacing(8), |ui| {
                for variant in Variant::ALL {
                    ui.button(variant.name()).variant(variant);
                }
            });
            ui.input().placeholder("Type something");
            ui.checkbox("Enable feature")
                .checked(feature)
                .on_click(self.feature.updater(|v| !v));
        }))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
