//! Demo components, also used as end-to-end fixtures.
//!
//! - [`Counter`] — "Count: N" with "-" and "+" buttons.
//! - [`ThemeDemo`] — palette switcher plus a small widget gallery.
//! - [`Launcher`] — lists the demos and records a selection.

pub mod counter;
pub mod launcher;
pub mod theme_demo;

pub use counter::Counter;
pub use launcher::Launcher;
pub use theme_demo::ThemeDemo;

use crate::app::{App, AppConfig};
use crate::reactive::ComponentId;

/// Names the launcher lists, in display order.
pub const DEMOS: [&str; 2] = ["Counter", "Theme Demo"];

/// Window settings for a demo by name.
pub fn window(name: &str) -> Option<AppConfig> {
    match name {
        "Counter" => Some(Counter::window()),
        "Theme Demo" => Some(ThemeDemo::window()),
        "Launcher" => Some(Launcher::window()),
        _ => None,
    }
}

/// Mount a demo by name.
pub fn mount(app: &mut App, name: &str) -> Option<ComponentId> {
    let id = match name {
        "Counter" => app.mount(Counter::new),
        "Theme Demo" => {
            let themes = app.themes();
            app.mount(|scope| ThemeDemo::new(scope, themes))
        }
        "Launcher" => app.mount(Launcher::new),
        _ => return None,
    };
    tracing::debug!(demo = name, "mounted");
    Some(id)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::runtime::reset_runtime;

    #[test]
    fn mount_by_name() {
        reset_runtime();
        let mut app = App::new(AppConfig::default());
        for name in DEMOS.iter().chain(&["Launcher"]) {
            let id = mount(&mut app, name).unwrap();
            assert!(window(name).is_some());
            assert!(app.registry().contains(id));
        }
        assert_eq!(mount(&mut app, "Tetris"), None);
        assert_eq!(app.components().len(), 3);
        assert_eq!(app.tick().rendered.len(), 3);
    }
}
