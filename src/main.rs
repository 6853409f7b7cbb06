//! Binary entry point: read settings, open the log, seed the record store and
//! drive the Ratatui event loop until the user exits.
use anyhow::Context;
use caravan_weigh::logging::setup_logging;
use caravan_weigh::{run_app, App, Config, RecordStore};
use tracing::info;

/// Returning a `Result` bubbles up fatal start-up problems (an unreadable
/// config file, a log directory we cannot create) to the terminal instead of
/// crashing silently.
fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    setup_logging(&config)?;
    info!(?config, "starting caravan-weigh");

    let store = RecordStore::default().with_relay_dismiss(config.relay_dismiss());
    let mut app = App::new(store);
    run_app(&mut app, config.poll_interval())
}
