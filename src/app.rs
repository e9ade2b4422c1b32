//! App struct: configuration, component mounting, the tick.
//!
//! [`App`] ties together the component registry, the scheduler, the theme
//! registry, the cross-thread mailbox and the renderers. It has no terminal of
//! its own: a [`Host`](crate::host::Host) drives it, and tests drive it
//! directly (see [`Pilot`](crate::testing::Pilot)).

use std::rc::Rc;
use std::time::Duration;

use crate::component::{Component, Registry, Scope};
use crate::event::dispatch::{self, Activation, DispatchError};
use crate::geometry::Size;
use crate::host::{Host, HostError};
use crate::reactive::{ComponentId, Mailbox};
use crate::reconcile::Patch;
use crate::render::{RetainedRenderer, Renderer, WidgetTree};
use crate::scheduler::{FlushReport, Scheduler};
use crate::theme::ThemeRegistry;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Window title.
    pub title: String,
    /// Window width requested from the host.
    pub width: u32,
    /// Window height requested from the host.
    pub height: u32,
    /// Name of the palette to activate on start.
    pub theme: Option<String>,
    /// How long the terminal host waits for input before ticking anyway.
    pub tick_rate: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Kumiki".to_owned(),
            width: 800,
            height: 600,
            theme: None,
            tick_rate: Duration::from_millis(50),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Requested window size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Overlay `KUMIKI_TITLE`, `KUMIKI_WIDTH`, `KUMIKI_HEIGHT`,
    /// `KUMIKI_THEME` and `KUMIKI_TICK_MS` from the environment.
    pub fn from_env(self) -> Self {
        self.overlay(|name| std::env::var(name).ok())
    }

    /// Overlay values from `lookup`. Malformed numbers are ignored with a
    /// warning.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn number<T: std::str::FromStr>(name: &str, raw: Option<String>) -> Option<T> {
            let raw = raw?;
            match raw.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(variable = name, value = %raw, "ignoring malformed number");
                    None
                }
            }
        }

        if let Some(title) = lookup("KUMIKI_TITLE") {
            self.title = title;
        }
        if let Some(width) = number("KUMIKI_WIDTH", lookup("KUMIKI_WIDTH")) {
            self.width = width;
        }
        if let Some(height) = number("KUMIKI_HEIGHT", lookup("KUMIKI_HEIGHT")) {
            self.height = height;
        }
        if let Some(theme) = lookup("KUMIKI_THEME") {
            self.theme = Some(theme);
        }
        if let Some(ms) = number::<u64>("KUMIKI_TICK_MS", lookup("KUMIKI_TICK_MS")) {
            self.tick_rate = Duration::from_millis(ms);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The application: mounted components plus everything needed to tick them.
pub struct App {
    config: AppConfig,
    registry: Registry,
    scheduler: Scheduler,
    themes: Rc<ThemeRegistry>,
    mailbox: Mailbox,
    retained: RetainedRenderer,
    /// Extra patch consumer (e.g. a recording renderer).
    sink: Option<Box<dyn Renderer>>,
    running: bool,
}

impl App {
    /// Create an app with the built-in palettes.
    pub fn new(config: AppConfig) -> Self {
        let themes = Rc::new(ThemeRegistry::default());
        if let Some(name) = &config.theme {
            if let Err(err) = themes.set_current(name) {
                tracing::warn!(%err, "keeping default theme");
            }
        }
        Self {
            config,
            registry: Registry::new(),
            scheduler: Scheduler::new(),
            themes,
            mailbox: Mailbox::new(),
            retained: RetainedRenderer::new(),
            sink: None,
            running: true,
        }
    }

    /// Also hand every patch to `renderer` (builder).
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.sink = Some(Box::new(renderer));
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared handle to the theme registry.
    pub fn themes(&self) -> Rc<ThemeRegistry> {
        Rc::clone(&self.themes)
    }

    /// Where background threads send state writes.
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Mounted components in mount order.
    pub fn components(&self) -> &[ComponentId] {
        self.registry.ids()
    }

    // -- Components ------------------------------------------------------------

    /// Construct and mount a component. It renders on the next tick.
    pub fn mount<C: Component>(&mut self, build: impl FnOnce(&mut Scope) -> C) -> ComponentId {
        self.registry.mount(build)
    }

    /// Destroy a component, clearing its displayed tree. Returns `false` if it
    /// wasn't mounted.
    pub fn unmount(&mut self, id: ComponentId) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        if let Some(patch) = self.registry.unmount(id) {
            self.render(id, &patch);
        }
        self.retained.release(id);
        if let Some(sink) = self.sink.as_mut() {
            sink.release(id);
        }
        true
    }

    /// The materialized widget tree of a component.
    pub fn widgets(&self, id: ComponentId) -> Option<&WidgetTree> {
        self.retained.tree(id)
    }

    pub fn widgets_mut(&mut self, id: ComponentId) -> Option<&mut WidgetTree> {
        self.retained.tree_mut(id)
    }

    // -- Events ----------------------------------------------------------------

    /// Invoke the targeted click handler without flushing.
    pub fn dispatch(&mut self, activation: &Activation) -> Result<(), DispatchError> {
        dispatch::dispatch(&self.registry, activation)
    }

    /// Invoke the targeted click handler, then run the tick.
    pub fn activate(&mut self, activation: &Activation) -> Result<FlushReport, DispatchError> {
        self.dispatch(activation)?;
        Ok(self.tick())
    }

    /// One tick: apply writes queued by other threads, flush dirty
    /// components, hand their patches to the renderers.
    pub fn tick(&mut self) -> FlushReport {
        for result in self.mailbox.drain() {
            if let Err(err) = result {
                tracing::warn!(%err, "dropped remote state write");
            }
        }
        let report = self.scheduler.flush(&mut self.registry);
        for frame in &report.frames {
            self.render(frame.component, &frame.patch);
        }
        report
    }

    fn render(&mut self, id: ComponentId, patch: &Patch) {
        if let Err(err) = self.retained.apply(id, patch) {
            tracing::warn!(component = ?id, %err, "patch did not fit widget tree");
        }
        if let Some(sink) = self.sink.as_mut() {
            if let Err(err) = sink.apply(id, patch) {
                tracing::warn!(component = ?id, %err, "renderer rejected patch");
            }
        }
    }

    // -- Running ---------------------------------------------------------------

    /// Hand control to a host until it quits.
    pub fn run(&mut self, host: &mut impl Host) -> Result<(), HostError> {
        self.running = true;
        host.run(self)
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    pub fn request_quit(&mut self) {
        self.running = false;
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ViewResult;
    use crate::reactive::runtime::reset_runtime;
    use crate::reactive::State;
    use crate::render::RecordingRenderer;
    use crate::view::chained::{button, column, text};
    use crate::view::Attributes;
    use std::collections::HashMap;

    struct Toggle {
        on: State<bool>,
    }

    impl Component for Toggle {
        fn name(&self) -> &str {
            "Toggle"
        }

        fn view(&self) -> ViewResult {
            let on = self.on.get()?;
            Ok(column([
                text(if on { "on" } else { "off" }),
                button("flip").on_click(self.on.updater(|v| !v)),
            ]))
        }
    }

    fn app_with_toggle() -> (App, ComponentId, State<bool>) {
        reset_runtime();
        let mut app = App::new(AppConfig::default());
        let mut cell = None;
        let id = app.mount(|scope| {
            let on = scope.state(false);
            cell = Some(on);
            Toggle { on }
        });
        (app, id, cell.unwrap())
    }

    // -- AppConfig -------------------------------------------------------------

    #[test]
    fn config_builder() {
        let config = AppConfig::new()
            .with_title("Counter")
            .with_size(300, 200)
            .with_theme("Nord")
            .with_tick_rate(Duration::from_millis(10));
        assert_eq!(config.title, "Counter");
        assert_eq!(config.size(), Size::new(300, 200));
        assert_eq!(config.theme.as_deref(), Some("Nord"));
        assert_eq!(config.tick_rate, Duration::from_millis(10));
    }

    #[test]
    fn config_overlay() {
        let env: HashMap<&str, &str> = [
            ("KUMIKI_TITLE", "From env"),
            ("KUMIKI_WIDTH", "640"),
            ("KUMIKI_HEIGHT", "tall"),
            ("KUMIKI_THEME", "Dracula"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::default().overlay(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.title, "From env");
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 600);
        assert_eq!(config.theme.as_deref(), Some("Dracula"));
    }

    #[test]
    fn config_theme_is_applied() {
        reset_runtime();
        let app = App::new(AppConfig::new().with_theme("nord"));
        assert_eq!(app.themes().current().name, "Nord");
        let app = App::new(AppConfig::new().with_theme("nope"));
        assert_eq!(app.themes().current_index(), 0);
    }

    // -- Ticking ---------------------------------------------------------------

    #[test]
    fn first_tick_materializes_widgets() {
        let (mut app, id, _) = app_with_toggle();
        assert!(app.widgets(id).is_none());
        let report = app.tick();
        assert_eq!(report.rendered, vec![id]);
        assert_eq!(app.widgets(id).map(WidgetTree::len), Some(3));
    }

    #[test]
    fn activate_runs_handler_then_flush() {
        let (mut app, id, on) = app_with_toggle();
        app.tick();
        let report = app.activate(&Activation::new(id, vec![0, 1])).unwrap();
        assert!(on.get().unwrap());
        assert_eq!(report.frame(id).map(|f| f.patch.update_count()), Some(1));
        let label = app.widgets(id).and_then(|w| w.resolve(&[0, 0]));
        let text = label.and_then(|l| app.widgets(id)?.get(l)?.text().map(str::to_owned));
        assert_eq!(text.as_deref(), Some("on"));
    }

    #[test]
    fn dispatch_batches_until_tick() {
        let (mut app, id, on) = app_with_toggle();
        app.tick();
        let flip = Activation::new(id, vec![0, 1]);
        app.dispatch(&flip).unwrap();
        app.dispatch(&flip).unwrap();
        // Back to the original value: nothing to render.
        assert!(!on.get().unwrap());
        let report = app.tick();
        assert!(report.frames.is_empty());
    }

    #[test]
    fn mailbox_writes_land_on_tick() {
        let (mut app, id, on) = app_with_toggle();
        app.tick();
        let remote = app.mailbox().remote(on);
        std::thread::spawn(move || remote.set(true)).join().unwrap().unwrap();
        assert!(!on.get().unwrap());
        let report = app.tick();
        assert!(on.get().unwrap());
        assert_eq!(report.render_count(id), 1);
    }

    #[test]
    fn unmount_clears_display() {
        let (mut app, id, on) = app_with_toggle();
        app.tick();
        assert!(app.unmount(id));
        assert!(app.widgets(id).is_none());
        assert!(on.set(true).is_err());
        assert!(!app.unmount(id));
        assert!(app.components().is_empty());
    }

    #[test]
    fn sink_sees_every_patch() {
        reset_runtime();
        let mut app = App::new(AppConfig::default()).with_renderer(RecordingRenderer::new());
        app.mount(|scope| Toggle { on: scope.state(true) });
        let report = app.tick();
        assert_eq!(report.frames.len(), 1);
    }

    #[test]
    fn quit_flag() {
        let (mut app, ..) = app_with_toggle();
        assert!(!app.should_quit());
        app.request_quit();
        assert!(app.should_quit());
    }
}
