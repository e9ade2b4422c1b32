//! Hosts: what drives an [`App`] from real or scripted input.
//!
//! - [`Host`] — the seam `App::run` hands control across.
//! - [`Session`] — focus and key handling for one component, shared by hosts.
//! - [`HeadlessHost`] — replays a script of input events, no terminal.
//! - [`TerminalHost`] — crossterm event loop drawing through the
//!   [`Driver`](crate::render::Driver).

pub mod focus;
pub mod terminal;

use std::collections::VecDeque;
use std::io;

pub use focus::FocusChain;
pub use terminal::TerminalHost;

use crate::app::App;
use crate::event::{Activation, Command, DispatchError, InputEvent};
use crate::reactive::ComponentId;
use crate::render::{WidgetId, WidgetTree};
use crate::scheduler::FlushReport;
use crate::view::NodeKind;

/// Errors that end a host's run.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("no component is mounted")]
    NothingMounted,
}

/// Drives an app until it quits.
pub trait Host {
    fn run(&mut self, app: &mut App) -> Result<(), HostError>;
}

/// The component a host shows: the one it was given, else the first mounted.
fn target(app: &App, component: Option<ComponentId>) -> Result<ComponentId, HostError> {
    component
        .or_else(|| app.components().first().copied())
        .ok_or(HostError::NothingMounted)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Input handling for one displayed component: focus chain, activation,
/// input editing.
#[derive(Debug)]
pub struct Session {
    component: ComponentId,
    focus: FocusChain,
}

impl Session {
    pub fn new(component: ComponentId) -> Self {
        Self {
            component,
            focus: FocusChain::new(),
        }
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focus.current_widget()
    }

    pub fn focus_chain(&self) -> &FocusChain {
        &self.focus
    }

    /// Tick the app, then rebuild the focus chain from the new widgets.
    pub fn tick(&mut self, app: &mut App) -> FlushReport {
        let report = app.tick();
        match app.widgets(self.component) {
            Some(tree) => self.focus.rebuild(tree),
            None => self.focus.clear(),
        }
        report
    }

    /// Whether the focused widget is an input.
    fn editing(&self, app: &App) -> bool {
        self.focused()
            .and_then(|id| app.widgets(self.component)?.get(id))
            .is_some_and(|w| w.kind == NodeKind::Input)
    }

    /// Handle one input event. Returns whether anything visible may have
    /// changed.
    pub fn handle(&mut self, app: &mut App, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => match Command::from_key(key, self.editing(app)) {
                Some(command) => {
                    self.command(app, command);
                    true
                }
                None => false,
            },
            InputEvent::Paste(text) if self.editing(app) => {
                for c in text.chars().filter(|c| !c.is_control()) {
                    self.command(app, Command::Insert(c));
                }
                true
            }
            InputEvent::Resize { .. } => true,
            InputEvent::Paste(_) | InputEvent::Ignored => false,
        }
    }

    /// Carry out one command.
    pub fn command(&mut self, app: &mut App, command: Command) {
        match command {
            Command::FocusNext => {
                self.focus.focus_next();
            }
            Command::FocusPrev => {
                self.focus.focus_previous();
            }
            Command::Activate => self.activate(app),
            Command::Insert(c) => self.edit(app, |tree, id| tree.insert_char(id, c)),
            Command::DeleteBack => self.edit(app, |tree, id| tree.delete_back(id)),
            Command::CaretLeft => self.edit(app, |tree, id| tree.move_caret(id, -1)),
            Command::CaretRight => self.edit(app, |tree, id| tree.move_caret(id, 1)),
            Command::Quit => app.request_quit(),
        }
    }

    fn activate(&mut self, app: &mut App) {
        let Some(path) = self
            .focused()
            .and_then(|id| app.widgets(self.component)?.path_of(id))
        else {
            return;
        };
        match app.dispatch(&Activation::new(self.component, path)) {
            Ok(()) => {}
            Err(DispatchError::NoHandler { path }) => {
                tracing::trace!(?path, "focused widget has no click handler");
            }
            Err(err) => tracing::warn!(%err, "activation failed"),
        }
    }

    fn edit(&mut self, app: &mut App, op: impl FnOnce(&mut WidgetTree, WidgetId) -> bool) {
        let Some(id) = self.focused() else {
            return;
        };
        if let Some(tree) = app.widgets_mut(self.component) {
            op(tree, id);
        }
    }
}

// ---------------------------------------------------------------------------
// HeadlessHost
// ---------------------------------------------------------------------------

/// Replays a fixed list of input events, ticking after each one.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    events: VecDeque<InputEvent>,
    component: Option<ComponentId>,
    reports: Vec<FlushReport>,
}

impl HeadlessHost {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Show this component instead of the first mounted one.
    pub fn with_component(mut self, component: ComponentId) -> Self {
        self.component = Some(component);
        self
    }

    /// Flush reports from every tick of the last run.
    pub fn reports(&self) -> &[FlushReport] {
        &self.reports
    }
}

impl Host for HeadlessHost {
    fn run(&mut self, app: &mut App) -> Result<(), HostError> {
        let mut session = Session::new(target(app, self.component)?);
        self.reports.clear();
        self.reports.push(session.tick(app));
        while !app.should_quit() {
            let Some(event) = self.events.pop_front() else {
                break;
            };
            if session.handle(app, event) {
                self.reports.push(session.tick(app));
            }
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
