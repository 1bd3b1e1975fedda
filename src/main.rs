mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::Context;
use app::EvDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::{load_source, AppState, Source};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env().context("reading configuration")?;
    log::info!("Starting with {config:?}");

    // The only network access: one blocking fetch before the window opens.
    let source = Source::Url(config.source_url.clone());
    let loaded = load_source(&source, &config.normalize);
    match &loaded {
        Ok(table) => log::info!("Loaded {} vehicles from {source}", table.len()),
        Err(e) => log::error!("Loading {source} failed: {e}"),
    }

    let mut state = AppState::new(config);
    state.set_loaded(source, loaded);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "EV Dashboard – Price, Efficiency and Range",
        options,
        Box::new(|_cc| Ok(Box::new(EvDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
