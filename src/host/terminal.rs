//! Crossterm event loop.
//!
//! Ticks the app, paints the displayed component's widget tree and waits up
//! to `tick_rate` for the next input event. The terminal is restored even when
//! the loop fails.

use crossterm::event;

use super::{target, Host, HostError, Session};
use crate::app::App;
use crate::event::InputEvent;
use crate::reactive::ComponentId;
use crate::render::{paint, Driver};

/// Runs an app in the alternate screen of the current terminal.
#[derive(Default)]
pub struct TerminalHost {
    driver: Driver,
    component: Option<ComponentId>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show this component instead of the first mounted one.
    pub fn with_component(mut self, component: ComponentId) -> Self {
        self.component = Some(component);
        self
    }

    fn event_loop(&mut self, app: &mut App, session: &mut Session) -> Result<(), HostError> {
        let mut needs_draw = true;
        let mut theme_generation = app.themes().generation();

        loop {
            let report = session.tick(app);
            if app.should_quit() {
                return Ok(());
            }
            let generation = app.themes().generation();
            if !report.is_idle() || generation != theme_generation {
                needs_draw = true;
                theme_generation = generation;
            }
            if needs_draw {
                self.draw(app, session)?;
                needs_draw = false;
            }
            if event::poll(app.config().tick_rate)? {
                let input = InputEvent::from(event::read()?);
                needs_draw |= session.handle(app, input);
            }
        }
    }

    fn draw(&mut self, app: &App, session: &Session) -> Result<(), HostError> {
        let (width, _) = Driver::terminal_size()?;
        let palette = app.themes().current();
        let lines = app
            .widgets(session.component())
            .map(|tree| paint(tree, &palette, session.focused(), usize::from(width)))
            .unwrap_or_default();
        self.driver.draw(&app.config().title, &lines, &palette)?;
        Ok(())
    }
}

impl Host for TerminalHost {
    fn run(&mut self, app: &mut App) -> Result<(), HostError> {
        let mut session = Session::new(target(app, self.component)?);
        tracing::info!(title = %app.config().title, size = %app.config().size(), "starting terminal host");
        self.driver.enter_alt_screen()?;
        let result = self.event_loop(app, &mut session);
        let restored = self.driver.leave_alt_screen();
        tracing::info!("terminal host stopped");
        result?;
        restored?;
        Ok(())
    }
}
