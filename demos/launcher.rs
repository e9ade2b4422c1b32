//! Launcher: pick a demo, quit, and the picked demo starts.
//! `cargo run --example launcher`.

use kumiki_core::demos::{self, Launcher};
use kumiki_core::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), HostError> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();

    let mut picked = None;
    let mut app = App::new(Launcher::window().from_env());
    app.mount(|scope| {
        let launcher = Launcher::new(scope);
        picked = Some(launcher.selected());
        launcher
    });
    app.run(&mut TerminalHost::new())?;

    let Some(name) = picked.and_then(|state| state.get().ok().flatten()) else {
        return Ok(());
    };
    let Some(config) = demos::window(name) else {
        return Ok(());
    };
    // Mounted components are released with the app.
    drop(app);
    let mut app = App::new(config.from_env());
    if demos::mount(&mut app, name).is_some() {
        app.run(&mut TerminalHost::new())?;
    }
    Ok(())
}
