//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` mounts components into an [`App`](crate::app::App), clicks
//! buttons by label, presses keys through the same [`Session`] the hosts use,
//! and keeps every [`FlushReport`] so tests can assert on the exact patches.

use crate::app::{App, AppConfig};
use crate::component::{Component, Scope};
use crate::event::{find_activatable, Activation, DispatchError, InputEvent, Key, KeyEvent, Modifiers};
use crate::host::Session;
use crate::reactive::ComponentId;
use crate::reconcile::Patch;
use crate::render::WidgetTree;
use crate::scheduler::FlushReport;
use crate::view::ViewNode;

use super::snapshot::paint_to_string;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// ```ignore
/// use kumiki_core::demos::Counter;
/// use kumiki_core::testing::Pilot;
///
/// let mut pilot = Pilot::new();
/// pilot.mount(Counter::new);
/// let report = pilot.click("+").unwrap();
/// assert_eq!(report.frames[0].patch.to_string(), r#"update [0, 0] text="Count: 1""#);
/// ```
pub struct Pilot {
    app: App,
    session: Option<Session>,
    reports: Vec<FlushReport>,
}

impl Pilot {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            app: App::new(config),
            session: None,
            reports: Vec::new(),
        }
    }

    // ── Components ───────────────────────────────────────────────────

    /// Mount a component and run the tick that renders it. The first mounted
    /// component receives key presses and label clicks.
    pub fn mount<C: Component>(&mut self, build: impl FnOnce(&mut Scope) -> C) -> ComponentId {
        let id = self.app.mount(build);
        self.session.get_or_insert_with(|| Session::new(id));
        self.tick();
        id
    }

    /// Unmount a component.
    pub fn unmount(&mut self, id: ComponentId) -> bool {
        if self.session.as_ref().is_some_and(|s| s.component() == id) {
            self.session = None;
        }
        self.app.unmount(id)
    }

    /// The component receiving input.
    pub fn focused_component(&self) -> Option<ComponentId> {
        self.session.as_ref().map(Session::component)
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Click the button or checkbox labelled `label` in the focused component,
    /// then tick.
    pub fn click(&mut self, label: &str) -> Result<&FlushReport, DispatchError> {
        let component = self.focused_component().ok_or(DispatchError::NoSuchLabel(label.to_owned()))?;
        self.click_in(component, label)
    }

    /// Click a labelled button or checkbox of a specific component, then tick.
    pub fn click_in(&mut self, component: ComponentId, label: &str) -> Result<&FlushReport, DispatchError> {
        self.press(component, label)?;
        Ok(self.tick())
    }

    /// Run a click handler without ticking, to batch several clicks into one
    /// flush.
    pub fn press(&mut self, component: ComponentId, label: &str) -> Result<(), DispatchError> {
        let tree = self
            .app
            .registry()
            .last_tree(component)
            .ok_or(DispatchError::UnknownComponent(component))?;
        let path = find_activatable(tree, label).ok_or_else(|| DispatchError::NoSuchLabel(label.to_owned()))?;
        self.app.dispatch(&Activation::new(component, path))
    }

    /// Simulate a key press with no modifiers, then tick.
    pub fn press_key(&mut self, key: Key) -> &FlushReport {
        self.press_key_with(key, Modifiers::NONE)
    }

    /// Simulate a key press with modifiers, then tick.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> &FlushReport {
        self.input(InputEvent::Key(KeyEvent::new(key, modifiers)))
    }

    /// Type each char of `text` as a separate key press.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press_key(Key::Char(c));
        }
    }

    /// Deliver any input event to the focused component, then tick.
    pub fn input(&mut self, event: InputEvent) -> &FlushReport {
        if let Some(session) = self.session.as_mut() {
            session.handle(&mut self.app, event);
        }
        self.tick()
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Run one tick and keep its report.
    pub fn tick(&mut self) -> &FlushReport {
        let report = match self.session.as_mut() {
            Some(session) => session.tick(&mut self.app),
            None => self.app.tick(),
        };
        self.reports.push(report);
        &self.reports[self.reports.len() - 1]
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn is_running(&self) -> bool {
        !self.app.should_quit()
    }

    /// Every flush report so far, oldest first.
    pub fn reports(&self) -> &[FlushReport] {
        &self.reports
    }

    pub fn last_report(&self) -> Option<&FlushReport> {
        self.reports.last()
    }

    /// Every patch emitted for `component`, oldest first.
    pub fn patches(&self, component: ComponentId) -> Vec<&Patch> {
        self.reports
            .iter()
            .filter_map(|r| r.frame(component))
            .map(|f| &f.patch)
            .collect()
    }

    /// The tree currently displayed for `component`.
    pub fn tree(&self, component: ComponentId) -> Option<&ViewNode> {
        self.app.registry().last_tree(component)
    }

    pub fn widgets(&self, component: ComponentId) -> Option<&WidgetTree> {
        self.app.widgets(component)
    }

    /// Painted text of the focused component, `width` cells wide.
    pub fn screen(&self, width: usize) -> String {
        let Some(session) = self.session.as_ref() else {
            return String::new();
        };
        let palette = self.app.themes().current();
        self.app
            .widgets(session.component())
            .map(|tree| paint_to_string(tree, &palette, session.focused(), width))
            .unwrap_or_default()
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
