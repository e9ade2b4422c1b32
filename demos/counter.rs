//! Counter demo: `cargo run --example counter`.

use kumiki_core::demos::Counter;
use kumiki_core::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), HostError> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();

    let mut app = App::new(Counter::window().from_env());
    app.mount(Counter::new);
    app.run(&mut TerminalHost::new())
}
