//! Theme switcher and widget gallery: `cargo run --example theme_demo`.

use kumiki_core::demos::ThemeDemo;
use kumiki_core::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), HostError> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();

    let mut app = App::new(ThemeDemo::window().from_env());
    let themes = app.themes();
    app.mount(|scope| ThemeDemo::new(scope, themes));
    app.run(&mut TerminalHost::new())
}
