mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use std::sync::Arc;
use study_radar_tui::api::{HttpStore, MemoryStore, RemoteStore};
use study_radar_tui::config::init_app_config;
use study_radar_tui::dashboard::Dashboard;
use study_radar_tui::logging::{init_logging, LogTarget};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;

    let headless = args.headless || args.json || !is_terminal();
    let target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(&config.log_path)
    };
    init_logging(target, args.debug)?;

    let route = args.start_route()?;
    let store: Arc<dyn RemoteStore> = if args.demo {
        info!("using the built-in sample store");
        Arc::new(MemoryStore::seeded())
    } else {
        info!(api_url = %config.api_url, timeout = ?config.timeout, "using the progress API");
        Arc::new(HttpStore::new(&config.api_url, config.timeout)?)
    };

    if headless {
        return event::run_headless(store.as_ref(), &route, args.json).await;
    }

    let mut app = App::new(Dashboard::new(store, route));

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
